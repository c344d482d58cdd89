//! In-memory transport for unit tests

use super::transport::{ApiRequest, ApiResponse, Method, Transport};
use crate::{Result, SyncError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Route = (Method, String);

#[derive(Default)]
struct Script {
    routes: HashMap<Route, VecDeque<Result<ApiResponse>>>,
    requests: Vec<ApiRequest>,
    closed: u32,
}

/// Replays canned responses per `(method, path)` and records every request
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
        self.push(method, path, Ok(response))
    }

    pub fn fail(&self, method: Method, path: &str, error: SyncError) -> &Self {
        self.push(method, path, Err(error))
    }

    fn push(&self, method: Method, path: &str, result: Result<ApiResponse>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn close_count(&self) -> u32 {
        self.script.lock().unwrap().closed
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut script = self.script.lock().unwrap();
        let route = (request.method, request.path.clone());
        script.requests.push(request);
        script
            .routes
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(SyncError::Transport(format!(
                    "no scripted response for {} {}",
                    route.0, route.1
                )))
            })
    }

    async fn close(&self) {
        self.script.lock().unwrap().closed += 1;
    }
}
