//! In-process test harness: the full app over a fresh database

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;

use bookstore_server::db::DocumentStore;
use bookstore_server::notify::MemoryNotifier;
use bookstore_server::{Config, OneshotRouter, ServerState};
use shared::models::{Role, UserUpdate};

pub struct TestApp {
    pub state: ServerState,
    pub notifier: Arc<MemoryNotifier>,
    _dir: TempDir,
}

pub struct Response {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("test.redb")).unwrap();
        let notifier = Arc::new(MemoryNotifier::new());
        let state = ServerState::new(Config::for_tests(dir.path()), store, notifier.clone());
        state.product_types().ensure_defaults().unwrap();
        Self {
            state,
            notifier,
            _dir: dir,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.state.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Response { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.call(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.call(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        self.call(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.call(Method::DELETE, uri, token, None).await
    }

    /// Sign up a customer; returns (token, user id)
    pub async fn signup(&self, email: &str, phone: &str, password: &str) -> (String, String) {
        let res = self
            .post(
                "/auth/signup",
                None,
                json!({
                    "firstName": "Test",
                    "lastName": "User",
                    "phoneNumber": phone,
                    "email": email,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        (
            res.body["token"].as_str().unwrap().to_string(),
            res.body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Sign up and promote to `role`; returns the token
    pub async fn signup_as(&self, role: Role, email: &str, phone: &str) -> String {
        let (token, id) = self.signup(email, phone, "secret-pass").await;
        self.state
            .users()
            .update(
                &id,
                UserUpdate {
                    role: Some(role),
                    ..Default::default()
                },
                true,
            )
            .unwrap();
        token
    }

    pub async fn admin(&self) -> String {
        self.signup_as(Role::Admin, "admin@example.com", "+380500000001")
            .await
    }

    pub async fn seller(&self) -> String {
        self.signup_as(Role::Seller, "seller@example.com", "+380500000002")
            .await
    }

    /// Id of the seeded product type with `key`
    pub async fn product_type(&self, key: &str) -> String {
        let res = self.get("/product-type", None).await;
        res.body
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["key"] == key)
            .and_then(|t| t["id"].as_str())
            .unwrap()
            .to_string()
    }

    /// Create a book product; returns the product JSON
    pub async fn create_book(&self, token: &str, name: &str, price: f64, book: Value) -> Value {
        let book_type = self.product_type("book").await;
        let res = self
            .post(
                "/product",
                Some(token),
                json!({
                    "name": name,
                    "price": price,
                    "quantity": 10,
                    "type": book_type,
                    "book": book,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body
    }
}

pub fn ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
