use sqlx::PgPool;
use studio_db::models::user::{CreateUser, User};
use studio_db::repositories::UserRepo;

/// Insert a staff user. The hash is a placeholder; these tests never log in.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}
