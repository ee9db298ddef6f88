pub mod dispatch;
pub mod ingest;
