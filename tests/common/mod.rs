#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use expense_tracker_server::{
    app, database::Db, database::init_db, state::AppState, token::TokenService,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-signing-secret-0123456789";
pub const TEST_PASSWORD: &str = "hunter22";

pub struct TestApp {
    pub router: Router,
    pub db: Db,
    pub tokens: TokenService,
    // Dropping this removes the database directory.
    _temp_dir: TempDir,
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();

    let db = init_db(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize database at {}: {}", data_path, e));
    let tokens = TokenService::new(TEST_SECRET, None);
    let router = app(AppState::new(db.clone(), tokens.clone()));

    TestApp {
        router,
        db,
        tokens,
        _temp_dir: temp_dir,
    }
}

impl TestApp {
    /// Sends one request through the router and returns the status and decoded JSON body
    /// (`Value::Null` for an empty body).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/register",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Registers `username` with [`TEST_PASSWORD`] and returns a bearer token for it.
    pub async fn signed_in_user(&self, username: &str) -> String {
        let (status, _) = self.register(username, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED, "registering {}", username);

        let (status, body) = self.login(username, TEST_PASSWORD).await;
        assert_eq!(status, StatusCode::CREATED, "logging in {}", username);
        body["token"]
            .as_str()
            .expect("login response should carry a token")
            .to_string()
    }

    /// Adds a transaction and returns its id.
    pub async fn add_transaction(&self, token: &str, transaction: Value) -> String {
        let (status, body) = self
            .request(Method::POST, "/add-transaction", Some(token), Some(transaction))
            .await;
        assert_eq!(status, StatusCode::CREATED, "adding transaction: {}", body);
        body["id"]
            .as_str()
            .expect("add response should carry the new id")
            .to_string()
    }

    pub async fn get_transaction(&self, token: &str, id: &str) -> (StatusCode, Value) {
        self.request(Method::GET, &format!("/transaction/{}", id), Some(token), None)
            .await
    }

    pub async fn summary(&self, token: &str, query: &str) -> (StatusCode, Value) {
        self.request(Method::GET, &format!("/summary{}", query), Some(token), None)
            .await
    }

    pub async fn count_transactions(&self) -> i64 {
        let conn = self.db.read().await;
        let mut rows = conn
            .query("SELECT COUNT(*) FROM transactions", ())
            .await
            .expect("Failed to execute count query");
        let row = rows
            .next()
            .await
            .expect("Failed to read count row")
            .expect("COUNT(*) always returns a row");
        row.get(0).expect("Failed to get count value")
    }
}

pub fn transaction(kind: &str, category: Option<i64>, amount: f64, date: &str, description: &str) -> Value {
    json!({
        "type": kind,
        "category": category,
        "amount": amount,
        "date": date,
        "description": description,
    })
}
