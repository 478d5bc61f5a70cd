//! reqwest-backed [`RemoteService`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    Account, AccountHistory, AccountUsage, CreateOptions, CreateServerOptions,
    CreateTransactionOptions, NewSshKey, Port, RebuildOptions, Server, SshKey, Transaction,
};
use crate::service::RemoteService;

/// Production API endpoint.
pub const DEFAULT_API_URL: &str = "https://app.bitlaunch.io/api/";

const HEADER_REQUEST_ID: &str = "x-request-id";
const USER_AGENT: &str = concat!("blcli/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`HttpRemoteService`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// API base URL; endpoint segments are appended to its path.
    pub base_url: Url,
    /// Static bearer token.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Identifier attached to every request of this process.
    pub request_id: String,
}

/// Remote service that talks to the API over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpRemoteService {
    client: Client,
    base_url: Url,
}

impl HttpRemoteService {
    /// Build a client with the bearer token and request id as default headers.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] when the token or request id cannot be
    /// encoded as a header, or the underlying client cannot be built.
    pub fn new(config: &HttpConfig) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ApiError::Client("API token contains invalid characters".to_string()))?;
        authorization.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, authorization);
        let request_id = HeaderValue::from_str(&config.request_id).map_err(|_| {
            ApiError::Client("request identifier contains invalid characters".to_string())
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()
            .map_err(|err| ApiError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Append `segments` to the base path, percent-encoding each one whole.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(ApiError::InvalidUrl(format!(
                "invalid path segment '{segment}'"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        tracing::debug!(path, status = %response.status(), "API response");

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_response(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        what: &'static str,
    ) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.client.get(url).query(query), &segments.join("/"))
            .await?;
        decode(response, what).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B, what: &'static str) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.client.post(url).json(body), &segments.join("/"))
            .await?;
        decode(response, what).await
    }

    async fn post_unit<B>(&self, segments: &[&str], body: Option<&B>) -> ApiResult<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let request = match body {
            Some(body) => self.client.post(url).json(body),
            None => self.client.post(url),
        };
        self.send(request, &segments.join("/")).await.map(drop)
    }

    async fn delete(&self, segments: &[&str]) -> ApiResult<()> {
        let url = self.endpoint(segments)?;
        self.send(self.client.delete(url), &segments.join("/"))
            .await
            .map(drop)
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn show_account(&self) -> ApiResult<Account> {
        self.get_json(&["user"], &[], "account").await
    }

    async fn account_usage(&self, period: &str) -> ApiResult<AccountUsage> {
        self.get_json(&["user", "usage"], &[("period", period.to_string())], "account usage")
            .await
    }

    async fn account_history(&self, page: i64, items: i64) -> ApiResult<AccountHistory> {
        self.get_json(
            &["user", "history"],
            &[("page", page.to_string()), ("items", items.to_string())],
            "account history",
        )
        .await
    }

    async fn list_servers(&self) -> ApiResult<Vec<Server>> {
        self.get_json(&["servers"], &[], "server list").await
    }

    async fn show_server(&self, id: &str) -> ApiResult<Server> {
        self.get_json(&["servers", id], &[], "server").await
    }

    async fn create_server(&self, options: &CreateServerOptions) -> ApiResult<Server> {
        self.post_json(&["servers"], &ServerEnvelope { server: options }, "server")
            .await
    }

    async fn destroy_server(&self, id: &str) -> ApiResult<()> {
        self.delete(&["servers", id]).await
    }

    async fn rebuild_server(&self, id: &str, options: &RebuildOptions) -> ApiResult<()> {
        self.post_unit(&["servers", id, "rebuild"], Some(options))
            .await
    }

    async fn resize_server(&self, id: &str, size_id: &str) -> ApiResult<()> {
        self.post_unit(
            &["servers", id, "resize"],
            Some(&ResizeRequest { size: size_id }),
        )
        .await
    }

    async fn restart_server(&self, id: &str) -> ApiResult<()> {
        self.post_unit::<()>(&["servers", id, "restart"], None)
            .await
    }

    async fn set_protection(&self, id: &str, enabled: bool) -> ApiResult<Server> {
        self.post_json(
            &["servers", id, "protection"],
            &ProtectionRequest { enabled },
            "server",
        )
        .await
    }

    async fn set_ports(&self, id: &str, ports: &[Port]) -> ApiResult<Server> {
        self.post_json(&["servers", id, "ports"], ports, "server")
            .await
    }

    async fn list_ssh_keys(&self) -> ApiResult<Vec<SshKey>> {
        self.get_json(&["ssh-keys"], &[], "ssh key list").await
    }

    async fn create_ssh_key(&self, key: &NewSshKey) -> ApiResult<SshKey> {
        self.post_json(&["ssh-keys"], key, "ssh key").await
    }

    async fn delete_ssh_key(&self, id: &str) -> ApiResult<()> {
        self.delete(&["ssh-keys", id]).await
    }

    async fn create_transaction(
        &self,
        options: &CreateTransactionOptions,
    ) -> ApiResult<Transaction> {
        self.post_json(&["transactions"], options, "transaction").await
    }

    async fn show_transaction(&self, id: &str) -> ApiResult<Transaction> {
        self.get_json(&["transactions", id], &[], "transaction")
            .await
    }

    async fn list_transactions(&self, page: i64, items: i64) -> ApiResult<Vec<Transaction>> {
        self.get_json(
            &["transactions"],
            &[("page", page.to_string()), ("items", items.to_string())],
            "transaction list",
        )
        .await
    }

    async fn create_options(&self, host_id: i64) -> ApiResult<CreateOptions> {
        let host_id = host_id.to_string();
        self.get_json(
            &["hosts-create-options", host_id.as_str()],
            &[],
            "create options",
        )
        .await
    }
}

#[derive(Serialize)]
struct ServerEnvelope<'a> {
    server: &'a CreateServerOptions,
}

#[derive(Serialize)]
struct ResizeRequest<'a> {
    size: &'a str,
}

#[derive(Serialize)]
struct ProtectionRequest {
    enabled: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

async fn decode<T: DeserializeOwned>(response: Response, what: &'static str) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { what, source })
}

/// Classify a non-success response into an [`ApiError`].
async fn classify_response(response: Response) -> ApiError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();

    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            if body_text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body_text
            }
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { message },
        StatusCode::NOT_FOUND => ApiError::NotFound { message },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { message },
        _ => ApiError::Status {
            status: status.as_u16(),
            message,
        },
    }
}
