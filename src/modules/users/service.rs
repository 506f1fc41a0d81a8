use anyhow::{Context, anyhow};
use scholaris_core::{AppError, PaginationMeta, SystemRole, can_grant_role, hash_password};
use scholaris_models::{
    CreateUserDto, PaginatedUsersResponse, RoleAssignmentRecord, RoleChangeResponse, User,
    UserFilterParams,
};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

const USER_COLUMNS: &str = "id, first_name, last_name, email, role, created_at, updated_at";

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

fn ensure_can_grant(actor: &AuthUser, role: SystemRole) -> Result<(), AppError> {
    if can_grant_role(actor.role, role) {
        return Ok(());
    }
    tracing::warn!(
        user_id = %actor.user_id,
        actor_role = %actor.role,
        requested_role = %role,
        "Role grant exceeds caller's authority"
    );
    Err(AppError::forbidden(format!(
        "Access denied. Role '{}' grants permissions you do not hold",
        role
    )))
}

async fn record_assignment(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    previous_role: Option<SystemRole>,
    new_role: SystemRole,
    assigned_by: Option<Uuid>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO role_assignments (user_id, previous_role, new_role, assigned_by)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(previous_role.map(SystemRole::as_str))
    .bind(new_role.as_str())
    .bind(assigned_by)
    .execute(&mut **tx)
    .await
    .context("Failed to record role assignment")?;

    Ok(())
}

pub struct UserService;

impl UserService {
    /// Creates an account with its initial role and records the assignment.
    ///
    /// The caller must hold every permission of the initial role.
    #[instrument(skip(db, actor, dto), fields(actor_id = %actor.user_id, role = %dto.role))]
    pub async fn create_user(
        db: &PgPool,
        actor: &AuthUser,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        ensure_can_grant(actor, dto.role)?;

        let hashed_password = hash_password(&dto.password)?;
        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(&hashed_password)
        .bind(dto.role.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(anyhow!("User with this email already exists"))
            } else {
                AppError::internal(anyhow::Error::new(e).context("Failed to insert user"))
            }
        })?;

        record_assignment(&mut tx, user.id, None, user.role, Some(actor.user_id)).await?;
        tx.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        filters: UserFilterParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let role = filters.role.map(SystemRole::as_str);
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(db)
        .await
        .context("Failed to count users")?;

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::text IS NULL OR role = $1)
            ORDER BY created_at, email
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(role)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch users")?;

        let meta = PaginationMeta::new(&filters.pagination, total, users.len());
        Ok(PaginatedUsersResponse { data: users, meta })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    /// Changes a user's role.
    ///
    /// The target row is locked for the whole check-update-audit sequence so
    /// concurrent reassignments of one user apply one after the other. The
    /// caller may not change their own role, and must be able to grant both
    /// the new role and the role being replaced.
    #[instrument(skip(db, actor), fields(actor_id = %actor.user_id))]
    pub async fn assign_role(
        db: &PgPool,
        actor: &AuthUser,
        user_id: Uuid,
        role: SystemRole,
    ) -> Result<RoleChangeResponse, AppError> {
        if user_id == actor.user_id {
            tracing::warn!(user_id = %actor.user_id, "Attempted self role assignment");
            return Err(AppError::forbidden("You cannot change your own role"));
        }
        ensure_can_grant(actor, role)?;

        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock user")?
        .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", user_id)))?;

        let previous_role = current.role;
        ensure_can_grant(actor, previous_role)?;

        if previous_role == role {
            tx.commit().await?;
            return Ok(RoleChangeResponse {
                user: current,
                previous_role,
                changed: false,
            });
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(role.as_str())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update user role")?;

        record_assignment(
            &mut tx,
            user_id,
            Some(previous_role),
            role,
            Some(actor.user_id),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            previous_role = %previous_role,
            new_role = %role,
            "Role reassigned"
        );

        Ok(RoleChangeResponse {
            user,
            previous_role,
            changed: true,
        })
    }

    /// Role history of a user, newest first.
    #[instrument(skip(db))]
    pub async fn get_role_history(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<RoleAssignmentRecord>, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(db)
            .await
            .context("Failed to check user")?;

        if !exists {
            return Err(AppError::not_found(anyhow!(
                "User with id {} not found",
                user_id
            )));
        }

        let records = sqlx::query_as::<_, RoleAssignmentRecord>(
            r#"
            SELECT id, user_id, previous_role, new_role, assigned_by, assigned_at
            FROM role_assignments
            WHERE user_id = $1
            ORDER BY seq DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch role history")?;

        Ok(records)
    }
}
