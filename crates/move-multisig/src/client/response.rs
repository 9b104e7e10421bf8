//! API response types.

use serde::{Deserialize, Serialize};

/// A response from the node API with its ledger-state headers.
///
/// The headers carry the ledger version the response was served at, which
/// the aggregator threads back into follow-up reads to keep a multi-request
/// listing consistent.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    /// The response body.
    pub data: T,
    /// The ledger version at the time of the request.
    pub ledger_version: Option<u64>,
    /// The ledger timestamp in microseconds.
    pub ledger_timestamp: Option<u64>,
    /// The epoch number.
    pub epoch: Option<u64>,
    /// The block height.
    pub block_height: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Maps the inner data, keeping the headers.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            ledger_version: self.ledger_version,
            ledger_timestamp: self.ledger_timestamp,
            epoch: self.epoch,
            block_height: self.block_height,
        }
    }
}

/// Ledger information from the node root endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfo {
    /// The chain ID.
    pub chain_id: u8,
    /// The epoch number.
    pub epoch: String,
    /// The ledger version.
    pub ledger_version: String,
    /// The ledger timestamp in microseconds.
    pub ledger_timestamp: String,
    /// The block height.
    pub block_height: String,
}

/// Gas price estimation from the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasEstimation {
    /// Current recommended gas unit price.
    pub gas_estimate: u64,
    /// Lower-priority price, when the node provides one.
    pub deprioritized_gas_estimate: Option<u64>,
    /// Price for prioritized inclusion, when the node provides one.
    pub prioritized_gas_estimate: Option<u64>,
}

/// Response when submitting a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// The transaction hash.
    pub hash: String,
    /// The sender address.
    pub sender: String,
    /// The sequence number, as a decimal string.
    pub sequence_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_keeps_headers() {
        let resp = ApiResponse {
            data: 2u64,
            ledger_version: Some(100),
            ledger_timestamp: None,
            epoch: Some(7),
            block_height: None,
        };
        let doubled = resp.map(|v| v * 2);
        assert_eq!(doubled.data, 4);
        assert_eq!(doubled.ledger_version, Some(100));
        assert_eq!(doubled.epoch, Some(7));
    }

    #[test]
    fn ledger_info_deserializes() {
        let info: LedgerInfo = serde_json::from_value(serde_json::json!({
            "chain_id": 1,
            "epoch": "100",
            "ledger_version": "12345",
            "ledger_timestamp": "1700000000000000",
            "block_height": "5000",
        }))
        .unwrap();
        assert_eq!(info.ledger_version, "12345");
        assert_eq!(info.chain_id, 1);
    }
}
