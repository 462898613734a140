//! Scripted in-memory transport.
//!
//! Routes are keyed by method and path. A route answers from its queue of
//! canned responses first and from its handler once the queue is empty.
//! Every request is recorded, default headers included.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use taskdeck_core::error::{Result, TaskdeckError};

use super::request::{ApiRequest, ApiResponse, Method};
use super::transport::HttpTransport;

type Handler = Arc<dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync>;

#[derive(Default)]
struct Route {
    queue: VecDeque<Result<ApiResponse>>,
    handler: Option<Handler>,
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<(Method, String), Route>,
    requests: Vec<ApiRequest>,
}

#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Queues one JSON response for `method path`.
    pub fn enqueue(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.enqueue_result(method, path, Ok(ApiResponse::json_body(status, &body)))
    }

    /// Queues a transport failure for `method path`.
    pub fn enqueue_failure(&self, method: Method, path: &str, message: &str) -> &Self {
        self.enqueue_result(method, path, Err(TaskdeckError::transport(message)))
    }

    fn enqueue_result(&self, method: Method, path: &str, result: Result<ApiResponse>) -> &Self {
        self.with_state(|state| {
            state
                .routes
                .entry((method, path.to_string()))
                .or_default()
                .queue
                .push_back(result)
        });
        self
    }

    /// Answers `method path` with `handler` whenever the queue is empty.
    pub fn respond<F>(&self, method: Method, path: &str, handler: F) -> &Self
    where
        F: Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
    {
        self.with_state(|state| {
            state
                .routes
                .entry((method, path.to_string()))
                .or_default()
                .handler = Some(Arc::new(handler));
        });
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.with_state(|state| state.requests.clone())
    }

    /// Number of requests received for `method path`.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.with_state(|state| {
            state
                .requests
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .count()
        })
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, _base_url: &str, request: &ApiRequest) -> Result<ApiResponse> {
        // Lets concurrent callers interleave between request and response.
        tokio::task::yield_now().await;

        let scripted = self.with_state(|state| {
            state.requests.push(request.clone());
            let route = state
                .routes
                .get_mut(&(request.method, request.path.clone()))?;
            match route.queue.pop_front() {
                Some(result) => Some(result),
                None => route.handler.as_ref().map(|handler| Ok(handler(request))),
            }
        });

        scripted.unwrap_or_else(|| {
            Err(TaskdeckError::transport(format!(
                "No scripted response for {} {}",
                request.method, request.path
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_queue_then_handler() {
        let fake = FakeTransport::new();
        fake.enqueue(Method::Get, "/a", 500, json!({}))
            .respond(Method::Get, "/a", |_| ApiResponse::json_body(200, &json!([])));

        let first = fake.send("", &ApiRequest::get("/a")).await.unwrap();
        let second = fake.send("", &ApiRequest::get("/a")).await.unwrap();
        assert_eq!(first.status, 500);
        assert_eq!(second.status, 200);
        assert_eq!(fake.count(Method::Get, "/a"), 2);
    }

    #[tokio::test]
    async fn test_unscripted_route_fails() {
        let fake = FakeTransport::new();
        let err = fake.send("", &ApiRequest::delete("/x")).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(fake.requests().len(), 1);
    }
}
