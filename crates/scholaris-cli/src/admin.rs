//! Bootstrapping the first super admin.

use anyhow::{Context, bail};
use scholaris_core::{SystemRole, hash_password};
use scholaris_models::CreateUserDto;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Inserts a super admin and its creation audit record in one transaction.
///
/// Fails if the email is already taken or the fields do not validate.
pub async fn create_super_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let dto = CreateUserDto {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        email: email.trim().to_lowercase(),
        password: password.to_string(),
        role: SystemRole::SuperAdmin,
    };
    dto.validate().context("Invalid super admin details")?;

    let hashed_password =
        hash_password(&dto.password).map_err(|e| anyhow::anyhow!(e.message()))?;

    let mut tx = db.begin().await?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (first_name, last_name, email, password, role)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(&dto.first_name)
    .bind(&dto.last_name)
    .bind(&dto.email)
    .bind(&hashed_password)
    .bind(dto.role.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(user_id) = user_id else {
        tx.rollback().await?;
        bail!("User with this email already exists");
    };

    sqlx::query(
        "INSERT INTO role_assignments (user_id, previous_role, new_role, assigned_by)
         VALUES ($1, NULL, $2, NULL)",
    )
    .bind(user_id)
    .bind(dto.role.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_super_admin(pool: PgPool) {
        let id = create_super_admin(&pool, " Ada ", "Lovelace", "Ada@School.test", "password123")
            .await
            .unwrap();

        let (email, role): (String, String) =
            sqlx::query_as("SELECT email, role FROM users WHERE id = $1")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(email, "ada@school.test");
        assert_eq!(role, "super_admin");

        let rows: Vec<(Option<String>, String, Option<Uuid>)> = sqlx::query_as(
            "SELECT previous_role, new_role, assigned_by FROM role_assignments WHERE user_id = $1",
        )
        .bind(id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(rows, vec![(None, "super_admin".to_string(), None)]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_duplicate_email_rejected(pool: PgPool) {
        create_super_admin(&pool, "Ada", "Lovelace", "ada@school.test", "password123")
            .await
            .unwrap();

        let err = create_super_admin(&pool, "Grace", "Hopper", "ADA@school.test", "password123")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        let audits: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_assignments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!((users, audits), (1, 1));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_invalid_details_rejected(pool: PgPool) {
        let err = create_super_admin(&pool, "Ada", "Lovelace", "not-an-email", "short")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid super admin details"));

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 0);
    }
}
