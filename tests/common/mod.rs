#![allow(dead_code)]

use gymdesk::{
    domain::{CreateUserRequest, Role, User},
    repository::{SqliteUserRepository, UserRepository},
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// Fresh in-memory database with migrations applied. A single connection
/// keeps every query on the same memory database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await?;

    Ok(pool)
}

pub async fn create_user(pool: &SqlitePool, name: &str, email: &str, role: Role) -> anyhow::Result<User> {
    let repo = SqliteUserRepository::new(pool.clone());
    let user = repo
        .create(CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role,
        })
        .await?;
    Ok(user)
}
