//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, LlmError};

/// Stateless completion client - each call is independent
///
/// The engine only ever uses this to interpret free text into structured
/// adjustments. Every call site carries a non-LLM fallback, so a failing
/// client degrades behavior but never aborts an operation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and return the text response
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock client returning scripted responses in order
    pub struct MockLlmClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<String>) -> Self {
            Self {
                responses,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more mock responses".to_string()))
        }
    }

    /// Mock client that always fails, for degradation tests
    pub struct FailingLlmClient;

    #[async_trait]
    impl LlmClient for FailingLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::llm::Message;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec!["one".to_string(), "two".to_string()]);
            let req = CompletionRequest::new(vec![Message::user("hi")], 0.2);

            assert_eq!(client.complete(req.clone()).await.unwrap(), "one");
            assert_eq!(client.complete(req.clone()).await.unwrap(), "two");
            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let req = CompletionRequest::new(vec![Message::user("hi")], 0.2);
            assert!(client.complete(req).await.is_err());
        }
    }
}
