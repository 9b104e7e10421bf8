//! Multisig account state.

use crate::client::{ApiResponse, RestClient};
use crate::error::{MultisigError, MultisigResult};
use crate::types::AccountAddress;
use serde::Deserialize;
use std::ops::Range;

/// Resource type holding a multisig account's configuration and queue.
pub const MULTISIG_ACCOUNT_RESOURCE: &str = "0x1::multisig_account::MultisigAccount";

/// A snapshot of a multisig account's governing state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigAccountSummary {
    /// The multisig account's own address.
    pub address: AccountAddress,
    /// Current owners, in on-chain order.
    pub owners: Vec<AccountAddress>,
    /// Approvals required before a transaction can execute.
    pub signatures_required: u64,
    /// Sequence number of the last executed or rejected transaction.
    pub last_resolved_sequence_number: u64,
    /// Sequence number the next created transaction will receive.
    pub next_sequence_number: u64,
}

impl MultisigAccountSummary {
    /// Sequence numbers of transactions still awaiting resolution, in
    /// ascending order.
    pub fn pending_range(&self) -> Range<u64> {
        self.last_resolved_sequence_number + 1..self.next_sequence_number
    }

    /// True when at least one transaction awaits resolution.
    pub fn has_pending(&self) -> bool {
        !self.pending_range().is_empty()
    }

    /// The only sequence number that can be executed or rejected next.
    ///
    /// Resolution is strictly first-in first-out; later transactions stay
    /// queued behind this one regardless of their vote tallies.
    pub fn front_of_queue(&self) -> Option<u64> {
        self.has_pending()
            .then(|| self.last_resolved_sequence_number + 1)
    }
}

// On-chain representation; integers arrive as decimal strings.
#[derive(Deserialize)]
struct MultisigAccountResource {
    owners: Vec<AccountAddress>,
    num_signatures_required: String,
    last_executed_sequence_number: String,
    next_sequence_number: String,
}

fn parse_u64(field: &str, value: &str) -> MultisigResult<u64> {
    value
        .parse()
        .map_err(|_| MultisigError::Internal(format!("{field} is not a u64: {value:?}")))
}

/// Fetches the account summary, optionally pinned to a ledger version.
///
/// The response's ledger version header is preserved so callers can pin
/// follow-up reads to the same snapshot.
pub async fn fetch_summary(
    client: &RestClient,
    multisig_address: AccountAddress,
    ledger_version: Option<u64>,
) -> MultisigResult<ApiResponse<MultisigAccountSummary>> {
    let response = client
        .get_account_resource(multisig_address, MULTISIG_ACCOUNT_RESOURCE, ledger_version)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                MultisigError::NotFound(format!(
                    "{} is not a multisig account",
                    multisig_address.to_short_string()
                ))
            } else {
                e
            }
        })?;

    let data = response
        .data
        .get("data")
        .cloned()
        .ok_or_else(|| MultisigError::Internal("resource response has no data field".into()))?;
    let resource: MultisigAccountResource = serde_json::from_value(data)?;
    let summary = MultisigAccountSummary {
        address: multisig_address,
        owners: resource.owners,
        signatures_required: parse_u64(
            "num_signatures_required",
            &resource.num_signatures_required,
        )?,
        last_resolved_sequence_number: parse_u64(
            "last_executed_sequence_number",
            &resource.last_executed_sequence_number,
        )?,
        next_sequence_number: parse_u64(
            "next_sequence_number",
            &resource.next_sequence_number,
        )?,
    };
    Ok(response.map(|_| summary))
}

async fn bool_view(
    client: &RestClient,
    function: &str,
    multisig_address: AccountAddress,
    sequence_number: u64,
    ledger_version: Option<u64>,
) -> MultisigResult<bool> {
    let result = client
        .view(
            function,
            vec![],
            vec![
                serde_json::json!(multisig_address.to_canonical_string()),
                serde_json::json!(sequence_number.to_string()),
            ],
            ledger_version,
        )
        .await?;
    result
        .data
        .first()
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| MultisigError::Internal(format!("{function} did not return a bool")))
}

/// Whether the transaction has enough approvals to execute.
pub async fn can_be_executed(
    client: &RestClient,
    multisig_address: AccountAddress,
    sequence_number: u64,
    ledger_version: Option<u64>,
) -> MultisigResult<bool> {
    bool_view(
        client,
        "0x1::multisig_account::can_be_executed",
        multisig_address,
        sequence_number,
        ledger_version,
    )
    .await
}

/// Whether the transaction has enough rejections to be removed.
pub async fn can_be_rejected(
    client: &RestClient,
    multisig_address: AccountAddress,
    sequence_number: u64,
    ledger_version: Option<u64>,
) -> MultisigResult<bool> {
    bool_view(
        client,
        "0x1::multisig_account::can_be_rejected",
        multisig_address,
        sequence_number,
        ledger_version,
    )
    .await
}

/// Both readiness checks against the same snapshot, issued concurrently.
pub async fn readiness(
    client: &RestClient,
    multisig_address: AccountAddress,
    sequence_number: u64,
    ledger_version: Option<u64>,
) -> MultisigResult<(bool, bool)> {
    let (executable, rejectable) = tokio::join!(
        can_be_executed(client, multisig_address, sequence_number, ledger_version),
        can_be_rejected(client, multisig_address, sequence_number, ledger_version),
    );
    Ok((executable?, rejectable?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summary(last: u64, next: u64) -> MultisigAccountSummary {
        MultisigAccountSummary {
            address: AccountAddress::from_hex("0xabc").unwrap(),
            owners: vec![AccountAddress::ONE],
            signatures_required: 2,
            last_resolved_sequence_number: last,
            next_sequence_number: next,
        }
    }

    #[test]
    fn pending_range_is_between_resolved_and_next() {
        let s = summary(5, 8);
        assert_eq!(s.pending_range().collect::<Vec<_>>(), vec![6, 7]);
        assert!(s.has_pending());
        assert_eq!(s.front_of_queue(), Some(6));
    }

    #[test]
    fn single_pending_transaction() {
        let s = summary(7, 9);
        assert_eq!(s.pending_range().collect::<Vec<_>>(), vec![8]);
        assert_eq!(s.front_of_queue(), Some(8));
    }

    #[test]
    fn fully_resolved_queue_has_no_front() {
        let s = summary(9, 10);
        assert!(!s.has_pending());
        assert_eq!(s.front_of_queue(), None);
    }

    async fn mock_client(server: &MockServer) -> RestClient {
        let url = format!("{}/v1", server.uri());
        RestClient::new(NetworkConfig::custom(&url).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn fetch_summary_parses_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "type": MULTISIG_ACCOUNT_RESOURCE,
                        "data": {
                            "owners": ["0x11", "0x22", "0x33"],
                            "num_signatures_required": "2",
                            "last_executed_sequence_number": "5",
                            "next_sequence_number": "8",
                        },
                    }))
                    .insert_header("x-aptos-ledger-version", "9000"),
            )
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let addr = AccountAddress::from_hex("0xabc").unwrap();
        let response = fetch_summary(&client, addr, None).await.unwrap();
        assert_eq!(response.ledger_version, Some(9000));
        let summary = response.data;
        assert_eq!(summary.owners.len(), 3);
        assert_eq!(summary.signatures_required, 2);
        assert_eq!(summary.pending_range().collect::<Vec<_>>(), vec![6, 7]);
    }

    #[tokio::test]
    async fn fetch_summary_maps_missing_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Resource not found",
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let addr = AccountAddress::from_hex("0xabc").unwrap();
        let err = fetch_summary(&client, addr, None).await.unwrap_err();
        assert!(matches!(err, MultisigError::NotFound(_)));
    }

    #[tokio::test]
    async fn readiness_queries_both_views() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/view"))
            .and(query_param("ledger_version", "9000"))
            .and(body_partial_json(serde_json::json!({
                "function": "0x1::multisig_account::can_be_executed",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([false])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/view"))
            .and(body_partial_json(serde_json::json!({
                "function": "0x1::multisig_account::can_be_rejected",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([true])))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let addr = AccountAddress::from_hex("0xabc").unwrap();
        let (executable, rejectable) = readiness(&client, addr, 6, Some(9000)).await.unwrap();
        assert!(!executable);
        assert!(rejectable);
    }
}
