//! Fullnode REST API client.

use crate::client::response::{ApiResponse, GasEstimation, LedgerInfo, PendingTransaction};
use crate::config::NetworkConfig;
use crate::error::{MultisigError, MultisigResult};
use crate::types::{AccountAddress, TypeTag};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const BCS_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";
const JSON_CONTENT_TYPE: &str = "application/json";
/// Default timeout for waiting for a transaction to be committed.
const DEFAULT_TRANSACTION_WAIT_TIMEOUT_SECS: u64 = 30;

/// Client for the fullnode REST API.
///
/// Reads accept an optional pinned ledger version so a sequence of requests
/// can observe a single consistent snapshot of chain state.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: NetworkConfig,
    client: Client,
}

impl RestClient {
    /// Creates a new client for the given network.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: NetworkConfig) -> MultisigResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(MultisigError::Http)?;
        Ok(Self { config, client })
    }

    /// Returns the network configuration this client talks to.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Gets the current ledger information.
    pub async fn get_ledger_info(&self) -> MultisigResult<ApiResponse<LedgerInfo>> {
        let url = self.build_url("");
        self.get_json(url).await
    }

    /// Gets the current sequence number for an account.
    pub async fn get_sequence_number(&self, address: AccountAddress) -> MultisigResult<u64> {
        let url = self.build_url(&format!("accounts/{address}"));
        let account: ApiResponse<serde_json::Value> = self.get_json(url).await?;
        account
            .data
            .get("sequence_number")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                MultisigError::Internal("account response has no sequence number".into())
            })
    }

    /// Gets a specific resource for an account.
    ///
    /// When `ledger_version` is given, the resource is read as of that
    /// version instead of the latest state.
    pub async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
        ledger_version: Option<u64>,
    ) -> MultisigResult<ApiResponse<serde_json::Value>> {
        let mut url = self.build_url(&format!(
            "accounts/{}/resource/{}",
            address,
            urlencoding::encode(resource_type)
        ));
        if let Some(version) = ledger_version {
            url.query_pairs_mut()
                .append_pair("ledger_version", &version.to_string());
        }
        self.get_json(url).await
    }

    /// Calls a view function, optionally pinned to a ledger version.
    pub async fn view(
        &self,
        function: &str,
        type_args: Vec<String>,
        args: Vec<serde_json::Value>,
        ledger_version: Option<u64>,
    ) -> MultisigResult<ApiResponse<Vec<serde_json::Value>>> {
        let mut url = self.build_url("view");
        if let Some(version) = ledger_version {
            url.query_pairs_mut()
                .append_pair("ledger_version", &version.to_string());
        }
        let body = serde_json::json!({
            "function": function,
            "type_arguments": type_args,
            "arguments": args,
        });
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .json(&body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Resolves the non-signer parameter types of an entry function from the
    /// on-chain module ABI.
    ///
    /// Signer parameters never appear in stored argument lists, so they are
    /// filtered out here; the result lines up index-for-index with a call's
    /// argument blobs.
    ///
    /// # Errors
    ///
    /// Returns [`AbiResolutionFailed`](MultisigError::AbiResolutionFailed)
    /// when the module or function cannot be found, and passes through
    /// [`UnsupportedTypeTag`](MultisigError::UnsupportedTypeTag) for
    /// parameter types outside the decodable set.
    pub async fn entry_function_abi(
        &self,
        module_address: AccountAddress,
        module_name: &str,
        function_name: &str,
    ) -> MultisigResult<Vec<TypeTag>> {
        let function_id = format!(
            "{}::{module_name}::{function_name}",
            module_address.to_short_string()
        );
        let url = self.build_url(&format!("accounts/{module_address}/module/{module_name}"));
        let module: ApiResponse<serde_json::Value> = match self.get_json(url).await {
            Ok(resp) => resp,
            Err(e) if e.is_not_found() => {
                return Err(MultisigError::abi(function_id, "module not found"));
            }
            Err(e) => return Err(MultisigError::abi(function_id, e.to_string())),
        };

        let functions = module
            .data
            .pointer("/abi/exposed_functions")
            .and_then(|v| v.as_array())
            .ok_or_else(|| MultisigError::abi(&function_id, "module has no ABI"))?;
        let function = functions
            .iter()
            .find(|f| f.get("name").and_then(|n| n.as_str()) == Some(function_name))
            .ok_or_else(|| MultisigError::abi(&function_id, "function not found in module ABI"))?;
        let params = function
            .get("params")
            .and_then(|v| v.as_array())
            .ok_or_else(|| MultisigError::abi(&function_id, "function ABI has no params"))?;

        let mut tags = Vec::with_capacity(params.len());
        for param in params {
            let param = param
                .as_str()
                .ok_or_else(|| MultisigError::abi(&function_id, "non-string param in ABI"))?;
            if param == "signer" || param == "&signer" {
                continue;
            }
            tags.push(TypeTag::parse(param)?);
        }
        Ok(tags)
    }

    /// Gets the current gas price estimation.
    pub async fn estimate_gas_price(&self) -> MultisigResult<ApiResponse<GasEstimation>> {
        let url = self.build_url("estimate_gas_price");
        self.get_json(url).await
    }

    /// Submits a signed transaction's canonical bytes.
    pub async fn submit_transaction(
        &self,
        signed_txn_bytes: Vec<u8>,
    ) -> MultisigResult<ApiResponse<PendingTransaction>> {
        let url = self.build_url("transactions");
        debug!(bytes = signed_txn_bytes.len(), "submitting signed transaction");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, BCS_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(signed_txn_bytes)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Simulates a transaction without committing it.
    ///
    /// The node returns one entry per transaction; each carries a `success`
    /// flag and a `vm_status` string.
    pub async fn simulate_transaction(
        &self,
        signed_txn_bytes: Vec<u8>,
    ) -> MultisigResult<ApiResponse<Vec<serde_json::Value>>> {
        let url = self.build_url("transactions/simulate");
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, BCS_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .body(signed_txn_bytes)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Gets a transaction by hash.
    pub async fn get_transaction_by_hash(
        &self,
        hash: &str,
    ) -> MultisigResult<ApiResponse<serde_json::Value>> {
        let url = self.build_url(&format!("transactions/by_hash/{hash}"));
        self.get_json(url).await
    }

    /// Waits for a transaction to be committed, polling with exponential
    /// backoff (200ms doubling up to 2s).
    ///
    /// Returns the committed transaction JSON whether or not it executed
    /// successfully; interpreting the outcome is the caller's job.
    pub async fn wait_for_transaction(
        &self,
        hash: &str,
        timeout: Option<Duration>,
    ) -> MultisigResult<ApiResponse<serde_json::Value>> {
        let timeout =
            timeout.unwrap_or(Duration::from_secs(DEFAULT_TRANSACTION_WAIT_TIMEOUT_SECS));
        let start = std::time::Instant::now();
        let max_interval = Duration::from_secs(2);
        let mut current_interval = Duration::from_millis(200);

        loop {
            match self.get_transaction_by_hash(hash).await {
                Ok(response) => {
                    // Committed transactions have a version; pending ones do not.
                    if response.data.get("version").is_some() {
                        return Ok(response);
                    }
                }
                Err(e) if e.is_not_found() => {
                    // Not seen by this node yet, keep waiting.
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() >= timeout {
                return Err(MultisigError::TransactionTimeout {
                    hash: hash.to_string(),
                    timeout_secs: timeout.as_secs(),
                });
            }

            tokio::time::sleep(current_interval).await;
            current_interval = std::cmp::min(current_interval * 2, max_interval);
        }
    }

    fn build_url(&self, path: &str) -> Url {
        let mut url = self.config.fullnode_url.clone();
        if !path.is_empty() {
            if !url.path().ends_with('/') {
                url.set_path(&format!("{}/", url.path()));
            }
            url.set_path(&format!("{}{}", url.path(), path));
        }
        url
    }

    async fn get_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        url: Url,
    ) -> MultisigResult<ApiResponse<T>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, JSON_CONTENT_TYPE)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: for<'de> serde::Deserialize<'de>>(
        response: reqwest::Response,
    ) -> MultisigResult<ApiResponse<T>> {
        let status = response.status();

        // Extract headers before consuming the response body.
        let header_u64 = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        };
        let ledger_version = header_u64("x-aptos-ledger-version");
        let ledger_timestamp = header_u64("x-aptos-ledger-timestamp");
        let epoch = header_u64("x-aptos-epoch");
        let block_height = header_u64("x-aptos-block-height");

        if status.is_success() {
            let data: T = response.json().await?;
            Ok(ApiResponse {
                data,
                ledger_version,
                ledger_timestamp,
                epoch,
                block_height,
            })
        } else {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            let error_code = body
                .get("error_code")
                .and_then(|v| v.as_str())
                .map(ToString::to_string);
            let vm_error_code = body
                .get("vm_error_code")
                .and_then(serde_json::Value::as_u64);

            Err(MultisigError::api_with_details(
                status.as_u16(),
                message,
                error_code,
                vm_error_code,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_client(server: &MockServer) -> RestClient {
        let url = format!("{}/v1", server.uri());
        RestClient::new(NetworkConfig::custom(&url).unwrap()).unwrap()
    }

    #[test]
    fn build_url_appends_path() {
        let client =
            RestClient::new(NetworkConfig::custom("http://localhost:8080/v1").unwrap()).unwrap();
        let url = client.build_url("accounts/0x1");
        assert_eq!(url.as_str(), "http://localhost:8080/v1/accounts/0x1");
    }

    #[tokio::test]
    async fn ledger_info_captures_version_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "chain_id": 126,
                        "epoch": "10",
                        "ledger_version": "5000",
                        "ledger_timestamp": "1700000000000000",
                        "block_height": "900",
                    }))
                    .insert_header("x-aptos-ledger-version", "5000"),
            )
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let info = client.get_ledger_info().await.unwrap();
        assert_eq!(info.ledger_version, Some(5000));
        assert_eq!(info.data.chain_id, 126);
    }

    #[tokio::test]
    async fn resource_read_pins_ledger_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/v1/accounts/0x0000000000000000000000000000000000000000000000000000000000000abc/resource/0x1%3A%3Amultisig_account%3A%3AMultisigAccount",
            ))
            .and(query_param("ledger_version", "777"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "0x1::multisig_account::MultisigAccount",
                "data": {"num_signatures_required": "2"},
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let addr = AccountAddress::from_hex("0xabc").unwrap();
        let resource = client
            .get_account_resource(addr, "0x1::multisig_account::MultisigAccount", Some(777))
            .await
            .unwrap();
        assert_eq!(
            resource.data.pointer("/data/num_signatures_required"),
            Some(&serde_json::json!("2"))
        );
    }

    #[tokio::test]
    async fn api_errors_carry_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Resource not found",
                "error_code": "resource_not_found",
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let addr = AccountAddress::from_hex("0xabc").unwrap();
        let err = client
            .get_account_resource(addr, "0x1::coin::CoinStore", None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        match err {
            MultisigError::Api {
                status_code,
                error_code,
                ..
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(error_code.as_deref(), Some("resource_not_found"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn view_posts_function_and_pins_version() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/view"))
            .and(query_param("ledger_version", "42"))
            .and(body_partial_json(serde_json::json!({
                "function": "0x1::multisig_account::can_be_executed",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([true])))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let result = client
            .view(
                "0x1::multisig_account::can_be_executed",
                vec![],
                vec![serde_json::json!("0xabc"), serde_json::json!("1")],
                Some(42),
            )
            .await
            .unwrap();
        assert_eq!(result.data, vec![serde_json::json!(true)]);
    }

    #[tokio::test]
    async fn abi_filters_signer_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/v1/accounts/0x0000000000000000000000000000000000000000000000000000000000000001/module/coin",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bytecode": "0x00",
                "abi": {
                    "exposed_functions": [
                        {"name": "balance", "params": ["address"]},
                        {"name": "transfer", "params": ["&signer", "address", "u64"]},
                    ],
                },
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let tags = client
            .entry_function_abi(AccountAddress::ONE, "coin", "transfer")
            .await
            .unwrap();
        assert_eq!(tags, vec![TypeTag::Address, TypeTag::U64]);
    }

    #[tokio::test]
    async fn abi_missing_function_is_resolution_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bytecode": "0x00",
                "abi": {"exposed_functions": []},
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let err = client
            .entry_function_abi(AccountAddress::ONE, "coin", "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, MultisigError::AbiResolutionFailed { .. }));
    }

    #[tokio::test]
    async fn abi_unsupported_param_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bytecode": "0x00",
                "abi": {
                    "exposed_functions": [
                        {"name": "lock", "params": ["&signer", "0x7::vault::Receipt"]},
                    ],
                },
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let err = client
            .entry_function_abi(AccountAddress::ONE, "vault", "lock")
            .await
            .unwrap_err();
        assert!(matches!(err, MultisigError::UnsupportedTypeTag(_)));
    }

    #[tokio::test]
    async fn wait_for_transaction_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "not found",
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let err = client
            .wait_for_transaction("0xdead", Some(Duration::from_millis(300)))
            .await
            .unwrap_err();
        assert!(matches!(err, MultisigError::TransactionTimeout { .. }));
    }

    #[tokio::test]
    async fn wait_for_transaction_returns_committed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/transactions/by_hash/0xfeed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "type": "user_transaction",
                "version": "123",
                "success": true,
                "vm_status": "Executed successfully",
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server).await;
        let committed = client
            .wait_for_transaction("0xfeed", Some(Duration::from_secs(2)))
            .await
            .unwrap();
        assert_eq!(committed.data.get("version"), Some(&serde_json::json!("123")));
    }
}
