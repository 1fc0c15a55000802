// src/db/user_repository.rs
// DOCUMENTATION: Users, profiles, and login sessions
// PURPOSE: Account persistence behind the auth service

use crate::db::is_unique_violation;
use crate::errors::VenueError;
use crate::models::{UpdateProfileRequest, User, UserProfile};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    /// Create a user and its profile in one transaction
    pub async fn create_with_profile(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<(User, UserProfile), VenueError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return VenueError::AlreadyExists(
                    "A user with that username already exists.".to_string(),
                );
            }
            log::error!("Failed to create user {}: {}", username, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (user_id, is_admin) VALUES ($1, $2) RETURNING *",
        )
        .bind(user.id)
        .bind(is_admin)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create profile for {}: {}", username, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        tx.commit()
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        log::info!("Registered user {} ({})", user.username, user.id);
        Ok((user, profile))
    }

    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, VenueError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up user {}: {}", username, e);
                VenueError::DatabaseError(e.to_string())
            })
    }

    /// Profile of a user, created on first access
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, VenueError> {
        sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to load profile of {}: {}", user_id, e);
                VenueError::DatabaseError(e.to_string())
            })
    }

    /// Partial update - only provided fields are modified
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        req: &UpdateProfileRequest,
    ) -> Result<UserProfile, VenueError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles
            SET bio = COALESCE($1, bio),
                location = COALESCE($2, location),
                date_of_birth = COALESCE($3, date_of_birth),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE user_id = $5
            RETURNING *
            "#,
        )
        .bind(req.bio.as_deref().map(str::trim))
        .bind(req.location.as_deref().map(str::trim))
        .bind(req.date_of_birth)
        .bind(req.phone.as_deref().map(str::trim))
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update profile of {}: {}", user_id, e);
            VenueError::DatabaseError(e.to_string())
        })?
        .ok_or_else(|| VenueError::NotFound(format!("Profile {}", user_id)))
    }

    /// Store a new avatar path; returns the previous one
    pub async fn set_avatar(
        pool: &PgPool,
        user_id: Uuid,
        avatar_path: &str,
    ) -> Result<Option<String>, VenueError> {
        let previous: Option<(Option<String>,)> = sqlx::query_as(
            r#"
            UPDATE user_profiles p
            SET avatar_path = $1, updated_at = NOW()
            FROM (SELECT user_id, avatar_path FROM user_profiles WHERE user_id = $2) old
            WHERE p.user_id = old.user_id
            RETURNING old.avatar_path
            "#,
        )
        .bind(avatar_path)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to set avatar of {}: {}", user_id, e);
            VenueError::DatabaseError(e.to_string())
        })?;

        match previous {
            Some((old,)) => Ok(old),
            None => Err(VenueError::NotFound(format!("Profile {}", user_id))),
        }
    }

    pub async fn set_admin(pool: &PgPool, user_id: Uuid, is_admin: bool) -> Result<(), VenueError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, is_admin) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET is_admin = EXCLUDED.is_admin, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(is_admin)
        .execute(pool)
        .await
        .map_err(|e| VenueError::DatabaseError(e.to_string()))?;

        log::info!("User {} admin flag set to {}", user_id, is_admin);
        Ok(())
    }

    pub async fn set_password(
        pool: &PgPool,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), VenueError> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub async fn create_session(
        pool: &PgPool,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), VenueError> {
        sqlx::query("INSERT INTO user_sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to create session for {}: {}", user_id, e);
                VenueError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    /// Active user owning an unexpired session
    pub async fn find_by_session(pool: &PgPool, token: &str) -> Result<Option<User>, VenueError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW() AND u.is_active
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Session lookup failed: {}", e);
            VenueError::DatabaseError(e.to_string())
        })
    }

    pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), VenueError> {
        sqlx::query("DELETE FROM user_sessions WHERE token = $1")
            .bind(token)
            .execute(pool)
            .await
            .map_err(|e| VenueError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    /// Remove expired sessions; returns how many were deleted
    pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, VenueError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to purge sessions: {}", e);
                VenueError::DatabaseError(e.to_string())
            })?;
        Ok(result.rows_affected())
    }
}
