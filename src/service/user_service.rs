use std::sync::Arc;
use validator::Validate;

use crate::{
    domain::*,
    error::{AppError, Result},
    repository::UserRepository,
};

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User> {
        request.validate()?;

        // Check for duplicate email
        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let user = self.repo.create(request).await?;
        tracing::info!("Created {} user {}", user.role.as_str(), user.id);
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<User> {
        request.validate()?;

        if let Some(ref email) = request.email {
            if let Some(existing) = self.repo.find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::Conflict("Email already exists".to_string()));
                }
            }
        }

        self.repo
            .update(id, request)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn list_users(&self, search: Option<&str>, limit: i64, offset: i64) -> Result<Vec<User>> {
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => self.repo.search(term).await,
            None => self.repo.list(limit, offset).await,
        }
    }
}
