#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use comments_api::auth::{generate_jwt, Claims};
use comments_api::config::AppConfig;
use comments_api::database::{
    Comment, CommentRepository, DatabaseError, MemoryCommentRepository, NewComment, SharedRepository,
};
use comments_api::{app, AppState};

pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({}): {:?}", e, self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl TestApp {
    /// Router over a fresh in-memory store
    pub fn new() -> Self {
        Self::with_repository(Arc::new(MemoryCommentRepository::new()))
    }

    pub fn with_repository(repository: SharedRepository) -> Self {
        let config = AppConfig::development();
        let router = app(AppState::new(repository, config.clone()));
        Self { router, config }
    }

    pub fn token_for(&self, user: Uuid) -> String {
        let claims = Claims::new(user, 1).expect("claims");
        generate_jwt(&claims, &self.config.security.jwt_secret).expect("token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await?.to_vec();
        Ok(TestResponse { status, content_type, body })
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        let res = self.request(Method::GET, "/api/comments", None, None).await?;
        assert_eq!(res.status, StatusCode::OK);
        match res.json() {
            Value::Array(items) => Ok(items),
            other => anyhow::bail!("expected array, got {}", other),
        }
    }

    pub async fn create(&self, user: Uuid, text: &str) -> Result<Value> {
        let token = self.token_for(user);
        let res = self
            .request(
                Method::POST,
                "/api/comments",
                Some(&token),
                Some(serde_json::json!({ "text": text })),
            )
            .await?;
        assert_eq!(res.status, StatusCode::OK, "create failed: {}", res.text());
        Ok(res.json())
    }
}

/// Store whose every call faults, for exercising the 500 path
pub struct FailingRepository;

#[async_trait]
impl CommentRepository for FailingRepository {
    async fn create(&self, _comment: NewComment) -> Result<Comment, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Comment>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn find_all_sorted(&self) -> Result<Vec<Comment>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn delete_by_id(&self, _id: Uuid) -> Result<bool, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}
