// HTTP client adapter.
// Outgoing: attach the stored bearer token when there is one.
// Incoming: pass successes through; on 401 clear the session, fire the
// "session expired" hook and reject. Every other status goes back to the caller
// untouched. Each request is attempted exactly once.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::session::TokenStore;

// Called after a 401 has cleared the session (the "go to login" step)
pub type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    session: Arc<dyn TokenStore>,
    on_session_expired: Option<SessionExpiredHook>,
}

impl HttpClient {
    pub fn new(base_url: &str, session: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("reliability_client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, base_url, session)
    }

    // Reuse an existing reqwest client (proxy settings, test tweaks)
    pub fn with_client(client: Client, base_url: &str, session: Arc<dyn TokenStore>) -> ClientResult<Self> {
        // A trailing slash keeps any path prefix of the base URL when joining
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Ok(HttpClient {
            client,
            base_url: Url::parse(&normalized)?,
            session,
            on_session_expired: None,
        })
    }

    pub fn on_session_expired(mut self, hook: SessionExpiredHook) -> Self {
        self.on_session_expired = Some(hook);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn TokenStore> {
        &self.session
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // Outgoing injection point. The token is read once per request.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // Incoming injection point
    async fn intercept(&self, response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected credentials for {}; clearing session", response.url().path());
            if let Err(e) = self.session.clear() {
                tracing::error!("Failed to clear session after 401: {}", e);
            }
            if let Some(hook) = &self.on_session_expired {
                hook();
            }
            return Err(ClientError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "[Failed to read response body]".to_string());
        tracing::debug!(status = %status, body = %body, "Backend returned an error status");
        Err(ClientError::Http { status, body })
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ClientResult<Response> {
        let url = self.url(path)?;
        tracing::debug!(%method, url = %url, "Sending request");
        let request = self.authorize(build(self.client.request(method, url)));
        let response = request.send().await?;
        self.intercept(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let response = self.send(Method::GET, path, |b| b.query(query)).await?;
        Self::decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, |b| b.json(body)).await?;
        Self::decode(response).await
    }

    // For acknowledgements whose body is informational: an empty body
    // (204, blank 200), `null` or an unexpected shape reads as `T::default()`
    pub async fn post_ack<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let response = self.send(Method::POST, path, |b| b.json(body)).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::debug!("Ignoring unreadable acknowledgement from {}: {}", path, e);
            T::default()
        }))
    }

    // Raw body, for binary downloads
    pub async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self.send(Method::GET, path, |b| b).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;

    fn client(base: &str) -> HttpClient {
        HttpClient::new(base, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn joins_paths_onto_base_url() {
        let c = client("http://localhost:8000");
        assert_eq!(c.url("/v1/quota").unwrap().as_str(), "http://localhost:8000/v1/quota");

        let prefixed = client("https://api.example.com/reliability");
        assert_eq!(
            prefixed.url("/v1/history/export.csv").unwrap().as_str(),
            "https://api.example.com/reliability/v1/history/export.csv"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpClient::new("not a url", Arc::new(MemoryTokenStore::new()));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn outgoing_request_carries_token_only_when_present() {
        let store = Arc::new(MemoryTokenStore::new());
        let c = HttpClient::new("http://localhost:8000", store.clone()).unwrap();

        let bare = c.authorize(c.client.get("http://localhost:8000/v1/quota")).build().unwrap();
        assert!(bare.headers().get(reqwest::header::AUTHORIZATION).is_none());

        store.set("tok-123").unwrap();
        let authed = c.authorize(c.client.get("http://localhost:8000/v1/quota")).build().unwrap();
        assert_eq!(authed.headers()[reqwest::header::AUTHORIZATION], "Bearer tok-123");
    }
}
