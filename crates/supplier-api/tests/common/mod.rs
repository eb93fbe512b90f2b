#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use supplier_api::{build_router, AppState};
use supplier_infrastructure::{InMemorySupplierRepository, InMemoryUserRepository};
use supplier_shared::config::{IdentitySettings, JwtSettings, LockoutSettings, PasswordPolicySettings};
use supplier_shared::constants::DELETE_SUPPLIER_CLAIM;
use tower::ServiceExt;

pub const PASSWORD: &str = "Teste@123";
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let jwt = JwtSettings {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_hours: 1,
            issuer: "supplier-server".to_string(),
            audience: "https://localhost".to_string(),
        };
        let identity = IdentitySettings {
            password: PasswordPolicySettings::default(),
            lockout: LockoutSettings {
                enabled: true,
                max_failed_attempts: MAX_FAILED_ATTEMPTS,
                duration_minutes: 5,
            },
        };
        let state = AppState::new(
            Arc::new(InMemorySupplierRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            &jwt,
            &identity,
        );
        let router = build_router(state.clone());
        Self { state, router }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse { status, headers, body }
    }

    /// Registers `email` and returns its access token.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/registro",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "register failed: {}", response.body);
        response.body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers `email`, grants the delete claim and returns a fresh token carrying it.
    pub async fn admin_token(&self, email: &str) -> String {
        self.register(email).await;
        self.state
            .auth
            .grant_claim(email, DELETE_SUPPLIER_CLAIM, "true")
            .await
            .unwrap();

        let response = self.login(email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["access_token"].as_str().unwrap().to_string()
    }
}
