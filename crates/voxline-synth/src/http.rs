//! HTTP backend abstraction for the synthesis API.
//!
//! A trait-based HTTP backend allows dependency injection and testing
//! without a network. The production implementation uses reqwest.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::SynthClientConfig;
use crate::error::{SynthError, SynthResult};

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "xi-api-key";

/// Maximum number of error-body bytes kept for diagnostics.
const ERROR_DETAIL_LIMIT: usize = 512;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// HTTP operations the synthesis client needs.
///
/// This is an implementation detail; external code uses the port traits.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// POST a JSON body and deserialize a JSON response.
    async fn post_json<B, T>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send;

    /// POST a JSON body and return the raw response bytes.
    async fn post_bytes<B>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<Vec<u8>>
    where
        B: Serialize + Sync + ?Sized;

    /// GET and deserialize a JSON response.
    async fn get_json<T>(&self, url: &Url, api_key: &str) -> SynthResult<T>
    where
        T: DeserializeOwned + Send;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest.
///
/// No retries: a failed timed request falls through to the plain endpoint
/// at the session layer, and a retry here would only delay that.
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(config: &SynthClientConfig) -> SynthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    async fn check_status(url: &Url, response: reqwest::Response) -> SynthResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(SynthError::ApiRequestFailed {
            status: status.as_u16(),
            url: url.to_string(),
            detail: truncate_detail(&detail),
        })
    }
}

/// Keep the first [`ERROR_DETAIL_LIMIT`] bytes, cut on a char boundary.
fn truncate_detail(detail: &str) -> String {
    if detail.len() <= ERROR_DETAIL_LIMIT {
        return detail.to_string();
    }
    let mut end = ERROR_DETAIL_LIMIT;
    while !detail.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &detail[..end])
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn post_json<B, T>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .post(url.as_str())
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(url, response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn post_bytes<B>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<Vec<u8>>
    where
        B: Serialize + Sync + ?Sized,
    {
        let response = self
            .client
            .post(url.as_str())
            .header(API_KEY_HEADER, api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(url, response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T>(&self, url: &Url, api_key: &str) -> SynthResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let response = self
            .client
            .get(url.as_str())
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        let response = Self::check_status(url, response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub enum CannedResponse {
        Json(serde_json::Value),
        Bytes(Vec<u8>),
        Status(u16),
        /// Never completes; for cancellation tests.
        Hang,
    }

    /// A request seen by the fake backend.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub api_key: String,
        pub body: Option<serde_json::Value>,
    }

    /// A fake HTTP backend that returns canned responses by URL suffix.
    #[derive(Default)]
    pub struct FakeBackend {
        responses: Arc<Mutex<HashMap<String, CannedResponse>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl FakeBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a canned response for URLs ending with `suffix`.
        pub fn with_response(self, suffix: &str, response: CannedResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .insert(suffix.to_string(), response);
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        async fn respond(
            &self,
            url: &Url,
            api_key: &str,
            body: Option<serde_json::Value>,
        ) -> SynthResult<Payload> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                api_key: api_key.to_string(),
                body,
            });

            let found = {
                let responses = self.responses.lock().unwrap();
                responses
                    .iter()
                    .find(|(suffix, _)| url.path().ends_with(suffix.as_str()))
                    .map(|(_, r)| r.clone())
            };

            match found {
                Some(CannedResponse::Json(json)) => Ok(Payload::Json(json)),
                Some(CannedResponse::Bytes(bytes)) => Ok(Payload::Bytes(bytes)),
                Some(CannedResponse::Status(status)) => Err(SynthError::ApiRequestFailed {
                    status,
                    url: url.to_string(),
                    detail: String::new(),
                }),
                Some(CannedResponse::Hang) => std::future::pending().await,
                None => Err(SynthError::ApiRequestFailed {
                    status: 404,
                    url: url.to_string(),
                    detail: String::new(),
                }),
            }
        }
    }

    enum Payload {
        Json(serde_json::Value),
        Bytes(Vec<u8>),
    }

    impl Payload {
        fn into_json<T: DeserializeOwned>(self) -> SynthResult<T> {
            match self {
                Self::Json(json) => Ok(serde_json::from_value(json)?),
                Self::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
            }
        }

        fn into_bytes(self) -> SynthResult<Vec<u8>> {
            match self {
                Self::Json(json) => Ok(serde_json::to_vec(&json)?),
                Self::Bytes(bytes) => Ok(bytes),
            }
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn post_json<B, T>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<T>
        where
            B: Serialize + Sync + ?Sized,
            T: DeserializeOwned + Send,
        {
            let body = serde_json::to_value(body)?;
            self.respond(url, api_key, Some(body)).await?.into_json()
        }

        async fn post_bytes<B>(&self, url: &Url, api_key: &str, body: &B) -> SynthResult<Vec<u8>>
        where
            B: Serialize + Sync + ?Sized,
        {
            let body = serde_json::to_value(body)?;
            self.respond(url, api_key, Some(body)).await?.into_bytes()
        }

        async fn get_json<T>(&self, url: &Url, api_key: &str) -> SynthResult<T>
        where
            T: DeserializeOwned + Send,
        {
            self.respond(url, api_key, None).await?.into_json()
        }
    }
}
