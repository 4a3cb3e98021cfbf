pub mod clean;
pub mod columns;
pub mod meta;
pub mod parse;

pub use clean::{normalize_report, NormalizedReport};
pub use parse::{detect_file_kind, parse_bytes, CellValue, FileKind, RawTable};
