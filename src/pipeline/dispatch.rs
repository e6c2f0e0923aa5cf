//! Query dispatch: one question, one HTTP round trip, one answer.
//!
//! The wire contract is deliberately tiny:
//!
//! ```text
//! POST <endpoint>            {"question": "<text>"}
//! 200 OK                     {"answer": "<text>"}
//! ```
//!
//! There are no retries and, unless configured, no timeout beyond the
//! transport's own. A blank question never reaches the network. Every other
//! failure is reported as a [`DispatchError`] whose user-facing text is the
//! same fixed sentinel; the variant and its detail go to the logs.

use crate::config::PlannerConfig;
use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

/// Anything that can turn a question into an answer.
///
/// [`HttpDispatcher`] is the real implementation; the session and tests
/// depend only on this trait.
pub trait AnswerSource: Send + Sync {
    /// Send `question` and return the answer text verbatim.
    ///
    /// Callers are expected to have rejected blank questions already.
    fn ask(&self, question: &str) -> impl Future<Output = Result<String, DispatchError>> + Send;
}

/// `true` if `query` has no non-whitespace character.
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// HTTP implementation of [`AnswerSource`].
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDispatcher {
    /// Build a dispatcher for `config.endpoint`.
    pub fn new(config: &PlannerConfig) -> Result<Self, DispatchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| DispatchError::Transport {
            endpoint: config.endpoint.clone(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> DispatchError {
        if e.is_timeout() {
            DispatchError::Timeout {
                endpoint: self.endpoint.clone(),
            }
        } else {
            DispatchError::Transport {
                endpoint: self.endpoint.clone(),
                detail: e.to_string(),
            }
        }
    }

    async fn post(&self, question: &str) -> Result<String, DispatchError> {
        let body = QueryRequest {
            question: question.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status {
                endpoint: self.endpoint.clone(),
                code: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let parsed: QueryResponse =
            serde_json::from_slice(&bytes).map_err(|e| DispatchError::MalformedBody {
                endpoint: self.endpoint.clone(),
                detail: e.to_string(),
            })?;

        Ok(parsed.answer)
    }
}

impl AnswerSource for HttpDispatcher {
    async fn ask(&self, question: &str) -> Result<String, DispatchError> {
        if is_blank(question) {
            return Err(DispatchError::EmptyQuery);
        }

        let start = Instant::now();
        info!(
            "Dispatching question ({} chars) to {}",
            question.chars().count(),
            self.endpoint
        );

        match self.post(question).await {
            Ok(answer) => {
                debug!(
                    "Answer received: {} chars in {}ms",
                    answer.chars().count(),
                    start.elapsed().as_millis()
                );
                Ok(answer)
            }
            Err(e) => {
                warn!("Dispatch failed after {}ms: {}", start.elapsed().as_millis(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \n\t"));
        assert!(!is_blank(" Goa "));
    }

    #[test]
    fn request_wire_format() {
        let json = serde_json::to_string(&QueryRequest {
            question: "Plan a 5-day trip to Mumbai".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"question":"Plan a 5-day trip to Mumbai"}"#);
    }

    #[test]
    fn response_ignores_extra_fields() {
        let r: QueryResponse =
            serde_json::from_str(r#"{"answer":"Day 1: Go","model":"x"}"#).unwrap();
        assert_eq!(r.answer, "Day 1: Go");
    }

    #[tokio::test]
    async fn blank_question_is_rejected_without_network() {
        let config = PlannerConfig::builder()
            .endpoint("http://127.0.0.1:9/query")
            .build()
            .unwrap();
        let dispatcher = HttpDispatcher::new(&config).unwrap();
        assert_eq!(dispatcher.ask("  ").await, Err(DispatchError::EmptyQuery));
    }
}
