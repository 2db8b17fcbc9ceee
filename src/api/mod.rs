pub mod error;
pub mod gateway;

pub use error::ApiError;
pub use gateway::{get_json, patch_json, post_json, ApiClient, Gateway};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use reqwest::Method;
    use serde_json::Value;

    use super::{ApiError, Gateway};

    /// Recorded request made against a [`StubGateway`].
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub method: Method,
        pub endpoint: String,
        pub body: Option<Value>,
    }

    /// Gateway stub for handler tests: replays queued responses in order
    /// and records every call it receives.
    #[derive(Default)]
    pub struct StubGateway {
        responses: Mutex<Vec<Result<Value, ApiError>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl StubGateway {
        pub fn returning(value: Value) -> Self {
            let stub = Self::default();
            stub.push_ok(value);
            stub
        }

        pub fn failing(error: ApiError) -> Self {
            let stub = Self::default();
            stub.push_err(error);
            stub
        }

        pub fn push_ok(&self, value: Value) {
            self.responses.lock().unwrap().push(Ok(value));
        }

        pub fn push_err(&self, error: ApiError) {
            self.responses.lock().unwrap().push(Err(error));
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Gateway for StubGateway {
        async fn request(
            &self,
            method: Method,
            endpoint: &str,
            body: Option<Value>,
        ) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(RecordedCall {
                method,
                endpoint: endpoint.to_string(),
                body,
            });
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                panic!("StubGateway received an unexpected request to {}", endpoint);
            }
            responses.remove(0)
        }
    }
}
