//! Fullnode REST API client and response types.

mod response;
mod rest;

pub use response::{ApiResponse, GasEstimation, LedgerInfo, PendingTransaction};
pub use rest::RestClient;
