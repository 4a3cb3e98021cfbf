pub mod auto_campaign;
pub mod manual_campaign;
pub mod negatives;
pub mod sheet;

pub use auto_campaign::{auto_campaign_document, AutoCampaignConfig};
pub use manual_campaign::{manual_campaign_document, ManualCampaignConfig};
pub use negatives::{negatives_csv, negatives_document};
pub use sheet::{BulkDocument, Sheet};
