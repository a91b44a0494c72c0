// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: scripted stores, recording backoff, mock API responses.

use crate::backoff::Backoff;
use crate::store::{ObjectKey, ObjectStore, StoreEvent, WatchStream};
use crate::types::workload::{Condition, READY_CONDITION};
use crate::types::{Workload, WorkloadSpec, WorkloadStatus};
use async_trait::async_trait;
use futures::{stream, StreamExt};
use http::{Request, Response};
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::core::ErrorResponse;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// Build a kube API error with the given HTTP code and reason
pub fn api_error(code: u16, reason: &str) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message: format!("{} for test", reason),
        reason: reason.to_string(),
        code,
    })
}

/// Build a workload; `ready` is an optional (status, message) Ready condition
pub fn make_workload(
    name: &str,
    namespace: &str,
    ready: Option<(&str, Option<&str>)>,
) -> Workload {
    let conditions = ready.map(|(status, message)| {
        vec![Condition {
            condition_type: READY_CONDITION.to_string(),
            status: status.to_string(),
            reason: None,
            message: message.map(String::from),
        }]
    });
    Workload {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            resource_version: Some("1".to_string()),
            ..Default::default()
        },
        spec: WorkloadSpec::default(),
        status: Some(WorkloadStatus {
            observed_generation: None,
            conditions,
        }),
    }
}

/// Create a mock workload JSON response
pub fn workload_json(name: &str, namespace: &str) -> String {
    serde_json::json!({
        "apiVersion": "apps.vigil.dev/v1alpha1",
        "kind": "Workload",
        "metadata": {
            "name": name,
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": {}
    })
    .to_string()
}

/// Backoff that records every requested attempt and never sleeps
#[derive(Default)]
pub struct RecordingBackoff {
    delays: Mutex<Vec<u32>>,
}

impl RecordingBackoff {
    pub fn delays(&self) -> Vec<u32> {
        self.delays.lock().unwrap().clone()
    }
}

impl Backoff for RecordingBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        self.delays.lock().unwrap().push(attempt);
        Duration::ZERO
    }
}

enum ScriptedSession {
    FailOpen(kube::Error),
    Deliver(Vec<kube::Result<StoreEvent<Workload>>>),
}

/// Object store replaying scripted get results and watch sessions.
///
/// Each `session` is one watch stream; it ends after its events, forcing a
/// reconnect. Once the script runs out, watches stay open and idle.
pub struct ScriptedStore {
    gets: Mutex<VecDeque<kube::Result<Workload>>>,
    sessions: Mutex<VecDeque<ScriptedSession>>,
    get_calls: AtomicUsize,
    watch_opens: AtomicUsize,
    cursors: Mutex<Vec<Option<String>>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        ScriptedStore {
            gets: Mutex::new(VecDeque::new()),
            sessions: Mutex::new(VecDeque::new()),
            get_calls: AtomicUsize::new(0),
            watch_opens: AtomicUsize::new(0),
            cursors: Mutex::new(Vec::new()),
        }
    }

    pub fn get(self, result: kube::Result<Workload>) -> Self {
        self.gets.lock().unwrap().push_back(result);
        self
    }

    pub fn session(self, events: Vec<kube::Result<StoreEvent<Workload>>>) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .push_back(ScriptedSession::Deliver(events));
        self
    }

    pub fn failed_open(self, err: kube::Error) -> Self {
        self.sessions
            .lock()
            .unwrap()
            .push_back(ScriptedSession::FailOpen(err));
        self
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn watch_opens(&self) -> usize {
        self.watch_opens.load(Ordering::SeqCst)
    }

    /// The cursor passed to each watch open, in order
    pub fn cursors(&self) -> Vec<Option<String>> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore<Workload> for ScriptedStore {
    async fn get(&self, _key: &ObjectKey) -> kube::Result<Workload> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.gets
            .lock()
            .unwrap()
            .pop_front()
            .expect("unscripted get call")
    }

    async fn watch(
        &self,
        _key: &ObjectKey,
        cursor: Option<&str>,
    ) -> kube::Result<WatchStream<Workload>> {
        self.watch_opens.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(cursor.map(String::from));
        let session = self.sessions.lock().unwrap().pop_front();
        match session {
            Some(ScriptedSession::FailOpen(err)) => Err(err),
            Some(ScriptedSession::Deliver(events)) => Ok(stream::iter(events).boxed()),
            None => Ok(stream::pending().boxed()),
        }
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().insert(
            ("GET".to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "https://kubernetes.default.svc")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();

        if let Some(resp) = responses.get(&(method.to_string(), path.to_string())) {
            return Some(resp.clone());
        }

        // prefix match for subresource paths
        for ((m, p), resp) in responses.iter() {
            if m == method && path.starts_with(p) {
                return Some(resp.clone());
            }
        }

        None
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            match response {
                Some((status, body)) => Ok(Response::builder()
                    .status(status)
                    .header("content-type", "application/json")
                    .body(Body::from(body.into_bytes()))
                    .unwrap()),
                None => {
                    // Default 404 for unmatched requests
                    let body = r#"{"kind":"Status","apiVersion":"v1","status":"Failure","message":"not found","reason":"NotFound","code":404}"#;
                    Ok(Response::builder()
                        .status(404)
                        .header("content-type", "application/json")
                        .body(Body::from(body.as_bytes().to_vec()))
                        .unwrap())
                }
            }
        })
    }
}
