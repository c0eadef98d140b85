use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;

use crate::auth::password::hash_password;
use crate::config::AdminConfig;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, is_admin
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, is_admin
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}

/// Idempotent bootstrap: seeds the configured admin account if absent.
/// Safe to call on every process start; never duplicates the row.
pub async fn ensure_admin(db: &PgPool, cfg: &AdminConfig) -> anyhow::Result<()> {
    if User::find_by_email(db, &cfg.email).await?.is_some() {
        return Ok(());
    }
    let hash = hash_password(&cfg.password)?;
    let user = User::create(db, &cfg.email, &hash, true).await?;
    info!(user_id = user.id, email = %user.email, "admin user created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;

    fn admin_cfg() -> AdminConfig {
        AdminConfig {
            email: "admin@test".into(),
            password: "test-password".into(),
        }
    }

    #[sqlx::test]
    async fn ensure_admin_seeds_exactly_one_admin(db: PgPool) {
        let cfg = admin_cfg();
        ensure_admin(&db, &cfg).await.unwrap();
        ensure_admin(&db, &cfg).await.unwrap();

        let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE is_admin = TRUE")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(admins, 1);

        let user = User::find_by_email(&db, &cfg.email)
            .await
            .unwrap()
            .expect("admin seeded");
        assert!(user.is_admin);
        assert!(verify_password(&cfg.password, &user.password_hash).unwrap());
    }
}
