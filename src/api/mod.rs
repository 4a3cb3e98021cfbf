pub mod analysis;
pub mod export;
pub mod routes;
pub mod upload;
