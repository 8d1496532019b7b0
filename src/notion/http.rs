//! Low-level HTTP plumbing for the hosted document store
//!
//! Owns everything the rest of the crate must not care about: bearer-token
//! headers, client-side request spacing, retry with exponential backoff on
//! 429/5xx (honouring `Retry-After`), and the status-to-error mapping.

use crate::error::{SyncError, SyncResult};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const API_VERSION: &str = "2022-06-28";
const MAX_RETRIES: u32 = 3;
// The hosted API allows an average of 3 requests per second.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(334);

pub(crate) struct Http {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    last_request: Mutex<Option<Instant>>,
}

impl Http {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| SyncError::Connection(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            last_request: Mutex::new(None),
        })
    }

    pub async fn get(&self, path: &str) -> SyncResult<Value> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> SyncResult<Value> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> SyncResult<Value> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> SyncResult<Value> {
        let url = format!("{}/{}", self.base_url, path);

        for attempt in 0..=MAX_RETRIES {
            self.throttle().await;
            debug!(%method, %url, attempt, "remote request");

            let mut request = self
                .client
                .request(method.clone(), &url)
                .header("Authorization", format!("Bearer {}", self.api_token))
                .header("Notion-Version", API_VERSION);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) if err.is_timeout() => {
                    return Err(SyncError::Connection(format!("request timeout: {}", err)));
                }
                Err(err) => {
                    return Err(SyncError::Connection(format!("request failed: {}", err)));
                }
            };

            let status = response.status();
            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(|err| SyncError::Connection(format!("invalid response body: {}", err)));
            }

            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            let message = error_message(response.json::<Value>().await.ok());

            match status {
                StatusCode::TOO_MANY_REQUESTS => {
                    let delay = retry_after.unwrap_or_else(|| backoff_seconds(attempt));
                    if attempt == MAX_RETRIES {
                        return Err(SyncError::RateLimited {
                            retry_after_seconds: delay,
                        });
                    }
                    warn!(%url, delay, "rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
                status if status.is_server_error() => {
                    if attempt == MAX_RETRIES {
                        return Err(SyncError::Api {
                            status: status.as_u16(),
                            message,
                        });
                    }
                    let delay = backoff_seconds(attempt);
                    warn!(%url, %status, delay, "server error, backing off");
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
                StatusCode::BAD_REQUEST => return Err(SyncError::Validation(message)),
                StatusCode::UNAUTHORIZED => return Err(SyncError::Auth(message)),
                StatusCode::FORBIDDEN => {
                    return Err(SyncError::Auth(format!("access forbidden: {}", message)));
                }
                StatusCode::NOT_FOUND => return Err(SyncError::NotFound(message)),
                status => {
                    return Err(SyncError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
            }
        }

        unreachable!("retry loop always returns")
    }

    /// Space requests so we stay under the remote's requests-per-second cap
    /// even before it answers 429.
    async fn throttle(&self) {
        let wait = {
            let mut last = self.last_request.lock().unwrap();
            let now = Instant::now();
            let wait = match *last {
                Some(previous) => {
                    let elapsed = now.duration_since(previous);
                    MIN_REQUEST_INTERVAL.saturating_sub(elapsed)
                }
                None => Duration::ZERO,
            };
            *last = Some(now + wait);
            wait
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

fn backoff_seconds(attempt: u32) -> u64 {
    1 << attempt
}

fn error_message(body: Option<Value>) -> String {
    body.as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_seconds(0), 1);
        assert_eq!(backoff_seconds(1), 2);
        assert_eq!(backoff_seconds(2), 4);
    }

    #[test]
    fn error_message_falls_back_when_body_is_opaque() {
        assert_eq!(error_message(None), "unknown error");
        let body = serde_json::json!({"message": "bad select option"});
        assert_eq!(error_message(Some(body)), "bad select option");
    }
}
