//! Input/output: simulation-run ingest and result exports.

pub mod export;
pub mod ingest;
