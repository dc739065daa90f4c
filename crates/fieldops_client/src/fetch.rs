use std::time::Duration;

use fieldops_core::{FailureKind, FetchError, ListResponse, PageRequest, RequestDescriptor};
use fieldops_logging::{ops_debug, ops_warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{EnvelopeTable, Resource};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Issues one list request and returns the unwrapped, still untyped rows.
#[async_trait::async_trait]
pub trait ListSource: Send + Sync {
    async fn fetch(
        &self,
        resource: Resource,
        descriptor: &RequestDescriptor,
        token: &str,
    ) -> Result<ListResponse<Value>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: ClientSettings,
    envelopes: EnvelopeTable,
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: ClientSettings, envelopes: EnvelopeTable) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            envelopes,
            client,
        })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn url_for(&self, path_and_query: &str) -> Result<reqwest::Url, FetchError> {
        let joined = format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            path_and_query
        );
        reqwest::Url::parse(&joined).map_err(|err| {
            FetchError::new(FailureKind::Network, format!("invalid url {joined}: {err}"))
        })
    }

    /// Sends one authenticated request and parses the body as JSON.
    /// An empty body yields `Value::Null`; the content type is not trusted.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&B>,
        token: &str,
    ) -> Result<Value, FetchError> {
        if token.trim().is_empty() {
            return Err(FetchError::unauthenticated());
        }
        let url = self.url_for(path_and_query)?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "*/*")
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
            request = request.header(CONTENT_TYPE, "application/json").body(bytes);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        ops_debug!("{} {} -> {}", method, path_and_query, status.as_u16());

        if !status.is_success() {
            let kind = FailureKind::from_status(status.as_u16());
            ops_warn!("{} {} failed: {}", method, path_and_query, kind);
            return Err(FetchError::new(kind, status.to_string()));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| {
            FetchError::new(FailureKind::Decode, format!("response is not JSON: {err}"))
        })
    }
}

#[async_trait::async_trait]
impl ListSource for ReqwestFetcher {
    async fn fetch(
        &self,
        resource: Resource,
        descriptor: &RequestDescriptor,
        token: &str,
    ) -> Result<ListResponse<Value>, FetchError> {
        let envelope = *self.envelopes.get(resource).ok_or_else(|| {
            FetchError::new(
                FailureKind::Decode,
                format!("no envelope configured for {resource}"),
            )
        })?;
        if envelope.pages_on_server() {
            let body = self
                .send::<()>(Method::GET, &descriptor.path_and_query(), None, token)
                .await?;
            return envelope.unwrap_list(body);
        }

        let body = self
            .send::<()>(
                Method::GET,
                &descriptor.without_paging().path_and_query(),
                None,
                token,
            )
            .await?;
        let all = envelope.unwrap_list(body)?;
        Ok(match descriptor.page() {
            Some(page) => page_locally(all, page),
            None => all,
        })
    }
}

/// Cuts one page out of a full listing. The count stays the full row count.
fn page_locally(response: ListResponse<Value>, page: PageRequest) -> ListResponse<Value> {
    let total_count = response.items.len() as u64;
    let start = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    let items = response.items.into_iter().skip(start).take(limit).collect();
    ListResponse::new(items, total_count)
}

/// Decodes unwrapped rows into the screen's row type.
pub fn decode_rows<T: DeserializeOwned>(
    response: ListResponse<Value>,
) -> Result<ListResponse<T>, FetchError> {
    let items = response
        .items
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(row).map_err(|err| {
                FetchError::new(FailureKind::Decode, format!("row {index}: {err}"))
            })
        })
        .collect::<Result<Vec<T>, _>>()?;
    Ok(ListResponse::new(items, response.total_count))
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Network, format!("timed out: {err}"));
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
