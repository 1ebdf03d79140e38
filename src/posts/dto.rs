use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{require_non_empty, Validate, ValidationError};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("title", &self.title)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
}

impl Validate for UpdatePostRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => require_non_empty("title", title),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedPostResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
