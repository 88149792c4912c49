use crate::dto::auth_dto::{ChangePasswordRequest, RegisterRequest, UpdateProfileRequest};
use crate::error::{Error, Result};
use crate::models::user::{Role, User, UserSummary};
use crate::services::course_service::total_pages;
use crate::utils::crypto::{hash_password, verify_password};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct PaginatedUsers {
    #[serde(rename = "items")]
    pub users: Vec<UserSummary>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn register(&self, payload: RegisterRequest) -> Result<User> {
        let email = payload.email.to_lowercase();

        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(payload.name)
        .bind(email)
        .bind(password_hash)
        .bind(Role::Employee.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("Failed to verify password: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_summary(&self, user_id: Uuid) -> Result<UserSummary> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: UpdateProfileRequest,
    ) -> Result<UserSummary> {
        let email = payload.email.map(|e| e.to_lowercase());

        if let Some(ref new_email) = email {
            let taken: Option<Uuid> =
                sqlx::query_scalar("SELECT id FROM users WHERE email = $1 AND id != $2")
                    .bind(new_email)
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?;
            if taken.is_some() {
                return Err(Error::BadRequest("Email already in use".to_string()));
            }
        }

        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                updated_at = NOW()
            WHERE id = $3
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(payload.name)
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        payload: ChangePasswordRequest,
    ) -> Result<()> {
        let user = self.get_user(user_id).await?;

        let ok = verify_password(&payload.current_password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("Failed to verify password: {}", e)))?;
        if !ok {
            return Err(Error::BadRequest("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(&payload.new_password)
            .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_users(
        &self,
        page: i64,
        limit: i64,
        search: Option<String>,
        role: Option<String>,
    ) -> Result<PaginatedUsers> {
        if let Some(ref r) = role {
            if r.parse::<Role>().is_err() {
                return Err(Error::BadRequest(format!("Unknown role: {}", r)));
            }
        }

        let offset = (page - 1) * limit;
        let search_param = search.map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, email, role, created_at FROM users
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
              AND ($2::text IS NULL OR role = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search_param.clone())
        .bind(role.clone())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
              AND ($2::text IS NULL OR role = $2)
            "#,
        )
        .bind(search_param)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedUsers {
            users,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        })
    }

    pub async fn update_role(&self, user_id: Uuid, role: &str) -> Result<UserSummary> {
        let parsed: Role = role
            .parse()
            .map_err(|_| Error::BadRequest(format!("Unknown role: {}", role)))?;

        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            UPDATE users SET role = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(parsed.as_str())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}
