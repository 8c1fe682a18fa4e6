//! In-process doubles for the upstream API and the auth server, and a
//! harness serving the whole app against them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header::AUTHORIZATION};
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::Value;
use url::Url;

use crate::client::ProxyClient;
use crate::middleware::AuthConfig;
use crate::upstream::{NavitimeClient, NavitimeConfig};
use crate::verify::VerifyClient;

#[derive(Debug, Clone)]
pub(crate) struct SeenRequest {
    pub uri: String,
    pub api_key: Option<String>,
}

struct Reply {
    status: StatusCode,
    body: Value,
    delay: Duration,
}

#[derive(Clone)]
struct MockState {
    reply: Arc<Mutex<Reply>>,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
    hits: Arc<AtomicUsize>,
}

/// Answers every path with the configured status and JSON body.
pub(crate) struct MockUpstream {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
    state: MockState,
}

impl MockUpstream {
    pub async fn start(status: StatusCode, body: Value) -> Self {
        let state = MockState {
            reply: Arc::new(Mutex::new(Reply {
                status,
                body,
                delay: Duration::ZERO,
            })),
            requests: Arc::new(Mutex::new(Vec::new())),
            hits: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new().fallback(reply).with_state(state.clone());
        let addr = serve(app).await;

        Self {
            addr,
            hits: state.hits.clone(),
            state,
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.reply.lock().unwrap().delay = delay;
        self
    }

    pub fn set_reply(&self, status: StatusCode, body: Value) {
        let mut reply = self.state.reply.lock().unwrap();
        reply.status = status;
        reply.body = body;
    }

    pub fn url(&self, path: &str) -> Url {
        format!("http://{}{path}", self.addr).parse().unwrap()
    }

    pub fn config(&self, api_key: Option<&str>) -> NavitimeConfig {
        NavitimeConfig::new(api_key.map(String::from))
            .with_transport_url(self.url("/transport_node/autocomplete"))
            .with_spot_url(self.url("/spot"))
            .with_route_url(self.url("/route_transit"))
    }

    pub fn client(&self) -> NavitimeClient {
        NavitimeClient::new(self.config(Some("test-key")))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> NavitimeClient {
        NavitimeClient::new(self.config(Some("test-key")).with_timeout(timeout))
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn reply(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.requests.lock().unwrap().push(SeenRequest {
        uri: request.uri().to_string(),
        api_key: request
            .headers()
            .get("x-rapidapi-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    });

    let (status, body, delay) = {
        let reply = state.reply.lock().unwrap();
        (reply.status, reply.body.clone(), reply.delay)
    };
    tokio::time::sleep(delay).await;
    (status, Json(body))
}

#[derive(Clone)]
struct AuthServerState {
    valid_token: Arc<String>,
    hits: Arc<AtomicUsize>,
}

/// Auth server double: `/api/verify` accepts exactly one bearer token.
pub(crate) struct MockAuthServer {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

impl MockAuthServer {
    pub async fn start(valid_token: &str) -> Self {
        let state = AuthServerState {
            valid_token: Arc::new(valid_token.to_string()),
            hits: Arc::new(AtomicUsize::new(0)),
        };
        let app = Router::new()
            .route("/api/verify", get(verify))
            .with_state(state.clone());
        let addr = serve(app).await;

        Self {
            addr,
            hits: state.hits,
        }
    }

    pub fn url(&self) -> Url {
        format!("http://{}", self.addr).parse().unwrap()
    }
}

async fn verify(State(state): State<AuthServerState>, request: Request) -> StatusCode {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {}", state.valid_token);
    match request.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => StatusCode::OK,
        _ => StatusCode::UNAUTHORIZED,
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// The full application served on an ephemeral port, backed by
/// [`MockUpstream`] and [`MockAuthServer`].
pub(crate) struct TestApp {
    pub addr: SocketAddr,
    pub upstream: MockUpstream,
    pub auth: MockAuthServer,
}

impl TestApp {
    pub const SESSION_TOKEN: &'static str = "valid-session";

    pub async fn start(status: StatusCode, body: Value) -> Self {
        let upstream = MockUpstream::start(status, body).await;
        let auth = MockAuthServer::start(Self::SESSION_TOKEN).await;

        let config = AuthConfig::new(auth.url(), "http://localhost:3000".parse().unwrap())
            .unwrap()
            .with_secure_cookies(false);
        let verifier = VerifyClient::new(&auth.url()).unwrap();
        let addr = serve(crate::server::app(upstream.client(), config, verifier)).await;

        Self {
            addr,
            upstream,
            auth,
        }
    }

    /// Proxy client carrying a session the auth double accepts.
    pub fn client(&self) -> ProxyClient {
        ProxyClient::new(&format!("http://{}", self.addr))
            .unwrap()
            .with_session_cookie("session_transport-search", Self::SESSION_TOKEN)
    }
}
