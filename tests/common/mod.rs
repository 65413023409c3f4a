#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// One scripted reply from the stub updates endpoint.
pub enum StubReply {
    Json(Value),
    Raw(StatusCode, String),
    Delayed(Duration, Value),
}

#[derive(Default)]
struct StubInner {
    replies: Mutex<VecDeque<StubReply>>,
    /// `since` parameter of every request received, in order.
    requests: Mutex<Vec<Option<String>>>,
}

/// A stub of the monitored server's `/api/monitor/updates` endpoint running on
/// an ephemeral port. Unscripted requests get an empty array.
pub struct StubServer {
    pub addr: SocketAddr,
    inner: Arc<StubInner>,
}

impl StubServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn push(&self, reply: StubReply) {
        self.inner.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_json(&self, body: Value) {
        self.push(StubReply::Json(body));
    }

    pub fn requests(&self) -> Vec<Option<String>> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }
}

async fn updates(
    State(inner): State<Arc<StubInner>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    inner
        .requests
        .lock()
        .unwrap()
        .push(params.get("since").cloned());

    let reply = inner.replies.lock().unwrap().pop_front();
    match reply {
        None => Json(json!([])).into_response(),
        Some(StubReply::Json(body)) => Json(body).into_response(),
        Some(StubReply::Raw(status, body)) => (status, body).into_response(),
        Some(StubReply::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            Json(body).into_response()
        }
    }
}

pub async fn spawn_stub() -> StubServer {
    let inner = Arc::new(StubInner::default());

    let app = Router::new()
        .route("/api/monitor/updates", get(updates))
        .with_state(inner.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer { addr, inner }
}

/// A URL on which nothing is listening.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn action(id: i64, timestamp: f64, action_type: &str, details: Value) -> Value {
    json!({
        "id": id,
        "timestamp": timestamp,
        "action_type": action_type,
        "details": details,
    })
}

/// Wait until `check` returns true or the timeout expires.
pub async fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

/// Log output captured from a thread-local `tracing` subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.text().lines().filter(|line| line.contains(needle)).count()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Route warnings and errors emitted on this thread into `CapturedLogs` until
/// the guard is dropped.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
