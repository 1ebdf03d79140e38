//! In-memory repositories and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::repo::{User, UserRepo},
    error::StoreError,
    posts::repo::{Post, PostRepo},
    state::AppState,
};

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

impl MemoryUserRepo {
    fn contains(&self, id: Uuid) -> bool {
        self.users.lock().unwrap().iter().any(|u| u.id == id)
    }
}

/// Posts keep a handle on the users so that an unknown author fails like the
/// `posts.author_id` foreign key does.
pub struct MemoryPostRepo {
    users: Arc<MemoryUserRepo>,
    posts: Mutex<Vec<Post>>,
}

impl MemoryPostRepo {
    pub fn new(users: Arc<MemoryUserRepo>) -> Self {
        Self {
            users,
            posts: Mutex::default(),
        }
    }
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn create(
        &self,
        author_id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Uuid, StoreError> {
        if !self.users.contains(author_id) {
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "insert violates foreign key posts_author_id_fkey: no user {author_id}"
            ))));
        }
        let post = Post {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            created_at: OffsetDateTime::now_utc(),
        };
        let id = post.id;
        self.posts.lock().unwrap().push(post);
        Ok(id)
    }

    async fn update(
        &self,
        author_id: Uuid,
        post_id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == author_id)
            .ok_or(StoreError::NotFound)?;
        if let Some(title) = title {
            post.title = title.to_string();
        }
        if let Some(content) = content {
            post.content = content.to_string();
        }
        Ok(())
    }

    async fn find_by_id(&self, post_id: Uuid) -> Result<Option<Post>, StoreError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == post_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.lock().unwrap().clone())
    }
}

/// Every call fails as if the pool could not hand out a connection.
pub struct FailingRepo;

fn pool_timeout<T>() -> Result<T, StoreError> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl UserRepo for FailingRepo {
    async fn create(&self, _: &str, _: &str, _: &str) -> Result<User, StoreError> {
        pool_timeout()
    }

    async fn find_by_email(&self, _: &str) -> Result<Option<User>, StoreError> {
        pool_timeout()
    }
}

#[async_trait]
impl PostRepo for FailingRepo {
    async fn create(&self, _: Uuid, _: &str, _: &str) -> Result<Uuid, StoreError> {
        pool_timeout()
    }

    async fn update(
        &self,
        _: Uuid,
        _: Uuid,
        _: Option<&str>,
        _: Option<&str>,
    ) -> Result<(), StoreError> {
        pool_timeout()
    }

    async fn find_by_id(&self, _: Uuid) -> Result<Option<Post>, StoreError> {
        pool_timeout()
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        pool_timeout()
    }
}

/// Fake state whose user and post stores both fail every call.
pub fn failing_state() -> AppState {
    let repo = Arc::new(FailingRepo);
    AppState::from_parts(AppState::fake().config, repo.clone(), repo)
}

/// Fail if a response body carries any store or driver detail.
pub fn assert_no_internal_detail(body: &Value) {
    let text = body.to_string().to_lowercase();
    for leak in ["pool", "timed out", "database", "foreign key", "sqlx"] {
        assert!(!text.contains(leak), "response leaks {leak:?}: {body}");
    }
}

/// Drive one request through the full router. Non-JSON bodies come back as
/// `Value::String`, an empty body as `Value::Null`.
pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = build_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Sign a user up through the API and return the issued token.
pub async fn signup_user(state: &AppState, email: &str, password: &str, name: &str) -> String {
    let (status, body) = send(
        state,
        Method::POST,
        "/api/v1/user/signup",
        None,
        Some(serde_json::json!({ "email": email, "password": password, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["token"].as_str().expect("token in body").to_string()
}
