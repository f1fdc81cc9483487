//! Data models: raw expense-extraction input, canonical receipts and configuration.

pub mod config;
pub mod expense;
pub mod receipt;
pub mod textract;
