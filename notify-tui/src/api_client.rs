//! API client layer for the REST collections and the live WebSocket feed.

use crate::config::TuiConfig;
use notify_core::{ListEnvelope, NotificationItem, Resource, RetryPolicy, WidgetKind};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for ApiClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
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
    paths: BTreeMap<&'static str, String>,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let paths = WidgetKind::all()
            .iter()
            .flat_map(|kind| kind.resources().iter())
            .map(|resource| (resource.key, config.path_for(resource)))
            .collect();

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            paths,
        })
    }

    pub fn url_for(&self, resource: &Resource) -> String {
        let path = self
            .paths
            .get(resource.key)
            .map(String::as_str)
            .unwrap_or(resource.default_path);
        format!("{}{}", self.base_url, path)
    }

    /// GET one collection and unwrap its `{ "data": [...] }` envelope.
    pub async fn fetch_collection(
        &self,
        resource: &Resource,
    ) -> Result<Vec<NotificationItem>, ApiClientError> {
        let url = self.url_for(resource);
        let response = self.client.get(url).send().await?;
        let envelope: ListEnvelope = self.parse_response(response).await?;
        Ok(envelope.into_items())
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str::<T>(&body)?)
        } else {
            let text = response.text().await?;
            Err(ApiClientError::InvalidResponse(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text
            )))
        }
    }
}

#[derive(Clone)]
pub struct WsClient {
    base_url: String,
    retry: RetryPolicy,
}

impl WsClient {
    pub fn new(config: &TuiConfig) -> Self {
        Self {
            base_url: config.ws_base_url.trim_end_matches('/').to_string(),
            retry: config.retry.policy(),
        }
    }

    pub fn with_policy(base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn url_for(&self, kind: WidgetKind) -> String {
        format!("{}{}", self.base_url, kind.socket_path())
    }

    pub async fn connect(&self, kind: WidgetKind) -> Result<WsStream, ApiClientError> {
        let (stream, _) = tokio_tungstenite::connect_async(self.url_for(kind)).await?;
        Ok(stream)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }
}
