use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use super::deploy::{Deploy, DeployHash};
use super::error::{DeployError, SubmissionError};

pub const PUT_DEPLOY_METHOD: &str = "account_put_deploy";

/// Delivers a signed deploy to the network. One attempt per call.
#[async_trait]
pub trait DeploySubmitter: Send + Sync {
    async fn put_deploy(&self, deploy: &Deploy) -> Result<DeployHash, DeployError>;
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct PutDeployResult {
    deploy_hash: String,
}

/// JSON-RPC client for a node's `/rpc` endpoint.
#[derive(Debug)]
pub struct RpcClient {
    url: Url,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// `timeout` bounds the whole request; `None` keeps the transport default.
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            url,
            client: builder.build()?,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, SubmissionError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!("Calling {} on {}", method, self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Node returned HTTP {} for {}", status, method);
            return Err(SubmissionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: JsonRpcResponse = serde_json::from_str(&body)
            .map_err(|e| SubmissionError::InvalidResponse(format!("{e}: {body}")))?;
        if let Some(err) = parsed.error {
            error!("{} rejected: {} ({})", method, err.message, err.code);
            return Err(SubmissionError::Rpc {
                code: err.code,
                message: err.message,
                data: err.data,
            });
        }
        parsed
            .result
            .ok_or_else(|| SubmissionError::InvalidResponse("response has no result".to_string()))
    }
}

#[async_trait]
impl DeploySubmitter for RpcClient {
    async fn put_deploy(&self, deploy: &Deploy) -> Result<DeployHash, DeployError> {
        let result = self
            .call(PUT_DEPLOY_METHOD, json!({ "deploy": deploy.to_json() }))
            .await?;
        let result: PutDeployResult = serde_json::from_value(result)
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;
        let hash = DeployHash::from_hex(&result.deploy_hash)
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;
        if &hash != deploy.hash() {
            return Err(SubmissionError::InvalidResponse(format!(
                "node acknowledged deploy {hash}, expected {}",
                deploy.hash()
            ))
            .into());
        }
        info!("Deploy {} accepted by {}", hash, self.url);
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casper::args::RuntimeArgs;
    use crate::casper::deploy::{ExecutableDeployItem, Timestamp, UnsignedDeploy, DEFAULT_TTL};
    use crate::casper::key::HashAddr;
    use crate::casper::signer::sign_deploy;
    use crate::casper::wallet::{Identity, KeyAlgorithm};
    use mockito::{Matcher, Server};

    fn signed_deploy() -> Deploy {
        let identity = Identity::from_secret_bytes(KeyAlgorithm::Ed25519, &[4u8; 32]).unwrap();
        let unsigned = UnsignedDeploy::new(
            identity.public_key().clone(),
            Timestamp::from_millis(1_700_000_000_000),
            DEFAULT_TTL,
            1,
            "casper-test".to_string(),
            ExecutableDeployItem::standard_payment(1_000_000_000),
            ExecutableDeployItem::StoredContractByHash {
                hash: HashAddr::new([0x11; 32]),
                entry_point: "claim".to_string(),
                args: RuntimeArgs::new(),
            },
        );
        sign_deploy(unsigned, &[&identity]).unwrap()
    }

    fn client(server: &Server) -> RpcClient {
        let url = Url::parse(&format!("{}/rpc", server.url())).unwrap();
        RpcClient::new(url, Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_put_deploy_success() {
        let mut server = Server::new_async().await;
        let deploy = signed_deploy();

        let mock = server
            .mock("POST", "/rpc")
            .match_body(Matcher::PartialJson(json!({
                "jsonrpc": "2.0",
                "method": "account_put_deploy",
                "params": { "deploy": { "hash": deploy.hash().to_hex() } }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "api_version": "1.5.6", "deploy_hash": deploy.hash().to_hex() }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let hash = client(&server).put_deploy(&deploy).await.unwrap();
        assert_eq!(&hash, deploy.hash());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_deploy_rpc_error_is_kept() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rpc")
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "error": { "code": -32008, "message": "invalid deploy", "data": "insufficient payment" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = client(&server).put_deploy(&signed_deploy()).await;
        match result {
            Err(DeployError::Submission(SubmissionError::Rpc { code, message, data })) => {
                assert_eq!(code, -32008);
                assert_eq!(message, "invalid deploy");
                assert_eq!(data, Some(json!("insufficient payment")));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_put_deploy_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rpc")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let result = client(&server).put_deploy(&signed_deploy()).await;
        assert!(matches!(
            result,
            Err(DeployError::Submission(SubmissionError::Http { status: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn test_put_deploy_transport_fault() {
        let url = Url::parse("http://127.0.0.1:1/rpc").unwrap();
        let client = RpcClient::new(url, Some(Duration::from_secs(2))).unwrap();

        let result = client.put_deploy(&signed_deploy()).await;
        assert!(matches!(
            result,
            Err(DeployError::Submission(SubmissionError::Transport(_)))
        ));
    }

    #[tokio::test]
    async fn test_put_deploy_garbage_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rpc")
            .with_status(200)
            .with_body("<html>proxy error</html>")
            .create_async()
            .await;

        let result = client(&server).put_deploy(&signed_deploy()).await;
        assert!(matches!(
            result,
            Err(DeployError::Submission(SubmissionError::InvalidResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_put_deploy_hash_mismatch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/rpc")
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": { "deploy_hash": "00".repeat(32) }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let result = client(&server).put_deploy(&signed_deploy()).await;
        assert!(matches!(
            result,
            Err(DeployError::Submission(SubmissionError::InvalidResponse(_)))
        ));
    }
}
