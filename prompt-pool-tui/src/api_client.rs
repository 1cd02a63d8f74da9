//! API client layer for the REST routes and the push websocket.

use crate::config::TuiConfig;
use async_trait::async_trait;
use prompt_pool_core::{NewRecord, Record, RecordId, RecordList};
use std::time::Duration;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

const PROMPTS_PATH: &str = "/prompts/";

/// The push connection as handed to the listener.
pub type PushStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ApiClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

/// Coarse classification used when reporting a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never got a usable answer (connect, timeout, reset).
    Transport,
    /// The service answered with a non-success status.
    Rejected,
    /// The service answered but the body could not be decoded.
    Malformed,
    Misconfigured,
}

impl ApiClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiClientError::Http(err) if err.is_decode() => FailureKind::Malformed,
            ApiClientError::Http(err) if err.is_builder() => FailureKind::Misconfigured,
            ApiClientError::Http(_) | ApiClientError::WebSocket(_) => FailureKind::Transport,
            ApiClientError::Status { .. } => FailureKind::Rejected,
            ApiClientError::Serde(_) => FailureKind::Malformed,
            ApiClientError::Config(_) => FailureKind::Misconfigured,
        }
    }
}

/// The three calls the client makes against the service.
///
/// Implementations never retry; a failed call is reported once and the caller
/// decides what happens next.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn fetch_records(&self) -> Result<RecordList, ApiClientError>;

    async fn create_record(&self, record: &NewRecord) -> Result<Record, ApiClientError>;

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiClientError>;
}

#[derive(Clone)]
pub struct ApiClient {
    rest: RestClient,
    ws: WsClient,
}

impl ApiClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let rest = RestClient::new(config)?;
        let ws = WsClient::new(config);
        Ok(Self { rest, ws })
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub fn ws(&self) -> &WsClient {
        &self.ws
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(&config.api_base_url, config.request_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        if base_url.trim().is_empty() {
            return Err(ApiClientError::Config("api_base_url is empty".to_string()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn prompts_url(&self) -> String {
        format!("{}{}", self.base_url, PROMPTS_PATH)
    }

    fn prompt_url(&self, id: RecordId) -> String {
        format!("{}{}{}", self.base_url, PROMPTS_PATH, id)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiClientError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteClient for RestClient {
    async fn fetch_records(&self) -> Result<RecordList, ApiClientError> {
        let response = self.client.get(self.prompts_url()).send().await?;
        let records: RecordList = self.parse_response(response).await?;
        debug!(count = records.len(), "Fetched record snapshot");
        Ok(records)
    }

    async fn create_record(&self, record: &NewRecord) -> Result<Record, ApiClientError> {
        let response = self
            .client
            .post(self.prompts_url())
            .json(record)
            .send()
            .await?;
        self.parse_response(response).await
    }

    async fn delete_record(&self, id: RecordId) -> Result<(), ApiClientError> {
        let response = self.client.delete(self.prompt_url(id)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct WsClient {
    endpoint: String,
}

impl WsClient {
    pub fn new(config: &TuiConfig) -> Self {
        Self::with_endpoint(&config.ws_endpoint)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }

    pub async fn connect(&self) -> Result<PushStream, ApiClientError> {
        let (stream, _) = tokio_tungstenite::connect_async(self.endpoint.as_str()).await?;
        debug!(endpoint = %self.endpoint, "Push channel connected");
        Ok(stream)
    }
}
