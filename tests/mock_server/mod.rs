//! In-process stand-in for the Ollama API
//!
//! Serves `POST /api/generate`, `GET /api/tags` and `GET /api/version`.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use warp::http::StatusCode;
use warp::Filter;

/// What the mock answers to a request
#[derive(Clone)]
pub enum MockReply {
    /// Status 200, body written piece by piece
    Stream(Vec<String>),
    /// Status 200, body pieces with a pause before each
    Paced(Vec<String>, Duration),
    /// Status 200, body pieces, then the connection stays open and silent
    Stall(Vec<String>),
    /// Non-success status with a plain body
    Status(u16, String),
}

/// Running mock server
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
    shutdown: mpsc::Sender<()>,
}

impl MockServer {
    /// Generate request bodies received so far
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(()).await;
    }
}

/// One JSON record followed by a newline
pub fn record(response: &str, done: bool) -> String {
    let mut obj = serde_json::json!({
        "model": "mistral",
        "created_at": "2023-08-04T19:22:45.499127Z",
        "response": response,
        "done": done,
    });
    if done {
        obj["total_duration"] = 5_589_157_167u64.into();
        obj["load_duration"] = 3_013_701_500u64.into();
    }
    serde_json::to_string(&obj).unwrap() + "\n"
}

/// `GET /api/tags` body listing `names`
pub fn tags(names: &[&str]) -> String {
    let models: Vec<_> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "size": 4_109_865_159u64 }))
        .collect();
    serde_json::json!({ "models": models }).to_string()
}

fn respond(reply: MockReply) -> warp::reply::Response {
    let (pieces, pause, stall) = match reply {
        MockReply::Stream(pieces) => (pieces, None, false),
        MockReply::Paced(pieces, pause) => (pieces, Some(pause), false),
        MockReply::Stall(pieces) => (pieces, None, true),
        MockReply::Status(code, text) => {
            let mut response = warp::reply::Response::new(text.into());
            *response.status_mut() =
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return response;
        }
    };

    let (mut tx, body) = warp::hyper::Body::channel();
    tokio::spawn(async move {
        for piece in pieces {
            if let Some(pause) = pause {
                tokio::time::sleep(pause).await;
            }
            if tx.send_data(piece.into()).await.is_err() {
                return;
            }
            tokio::task::yield_now().await;
        }
        if stall {
            // Hold the sender so the body never ends
            tokio::time::sleep(Duration::from_secs(3600)).await;
            drop(tx);
        }
    });
    warp::reply::Response::new(body)
}

/// Mock whose `/api/tags` lists `mistral:latest` and `llama2:7b`
pub async fn spawn_mock_server(reply: MockReply) -> MockServer {
    let models = MockReply::Stream(vec![tags(&["mistral:latest", "llama2:7b"])]);
    spawn_mock_server_with_tags(reply, models).await
}

pub async fn spawn_mock_server_with_tags(reply: MockReply, models: MockReply) -> MockServer {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    let generate = warp::post()
        .and(warp::path!("api" / "generate"))
        .and(warp::body::json())
        .map(move |body: serde_json::Value| {
            seen.lock().unwrap().push(body);
            respond(reply.clone())
        });

    let list = warp::get()
        .and(warp::path!("api" / "tags"))
        .map(move || respond(models.clone()));

    let version = warp::get()
        .and(warp::path!("api" / "version"))
        .map(|| respond(MockReply::Stream(vec![r#"{"version":"0.1.17"}"#.to_string()])));

    let routes = generate.or(list).unify().or(version).unify();

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async move {
            shutdown_rx.recv().await;
        });
    tokio::spawn(server);

    MockServer {
        url: format!("http://{}", addr),
        requests,
        shutdown: shutdown_tx,
    }
}
