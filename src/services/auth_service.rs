// src/services/auth_service.rs
// DOCUMENTATION: Accounts and session authentication
// PURPOSE: Password hashing, login sessions, and caller resolution for handlers

use crate::db::{RatingRepository, UserRepository};
use crate::errors::VenueError;
use crate::models::{
    LoginRequest, ProfileResponse, Rating, RegisterRequest, SessionResponse, SessionUser,
    UpdateProfileRequest, User, UserProfile,
};
use crate::services::{MediaStorage, StatisticsService, AVATARS_DIR};
use actix_web::HttpRequest;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionid";

/// Argon2id hash with a random salt
pub fn hash_password(password: &str) -> Result<String, VenueError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Password hashing failed: {}", e);
            VenueError::InternalError
        })
}

/// False for a wrong password or an unparseable hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// 64 hex chars from two v4 UUIDs
fn new_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Session token from the `sessionid` cookie or an `Authorization: Bearer` header
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

pub struct AuthService;

impl AuthService {
    /// Create user and profile, then log the new user in
    pub async fn register(
        pool: &PgPool,
        req: RegisterRequest,
        session_ttl_hours: i64,
    ) -> Result<SessionResponse, VenueError> {
        req.validate()?;

        let username = req.username.trim();
        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(VenueError::AlreadyExists(
                "A user with that username already exists.".to_string(),
            ));
        }

        let password_hash = hash_password(&req.password)?;
        let (user, profile) =
            UserRepository::create_with_profile(pool, username, req.email.trim(), &password_hash, false)
                .await?;

        StatisticsService::refresh(pool).await;

        Self::start_session(pool, user, profile, session_ttl_hours).await
    }

    pub async fn login(
        pool: &PgPool,
        req: LoginRequest,
        session_ttl_hours: i64,
    ) -> Result<SessionResponse, VenueError> {
        let user = UserRepository::find_by_username(pool, req.username.trim())
            .await?
            .filter(|u| u.is_active && verify_password(&req.password, &u.password_hash))
            .ok_or_else(|| {
                log::warn!("Failed login for {}", req.username);
                VenueError::InvalidInput(
                    "Please enter a correct username and password.".to_string(),
                )
            })?;

        let profile = UserRepository::get_profile(pool, user.id).await?;
        Self::start_session(pool, user, profile, session_ttl_hours).await
    }

    async fn start_session(
        pool: &PgPool,
        user: User,
        profile: UserProfile,
        session_ttl_hours: i64,
    ) -> Result<SessionResponse, VenueError> {
        let token = new_session_token();
        let expires_at = Utc::now() + Duration::hours(session_ttl_hours.max(1));
        UserRepository::create_session(pool, &token, user.id, expires_at).await?;

        log::info!("User {} logged in", user.username);
        Ok(SessionResponse {
            token,
            expires_at,
            user: user.to_response(profile.is_admin),
        })
    }

    pub async fn logout(pool: &PgPool, token: &str) -> Result<(), VenueError> {
        UserRepository::delete_session(pool, token).await
    }

    /// Caller of the request, if logged in
    pub async fn current_user(
        pool: &PgPool,
        req: &HttpRequest,
    ) -> Result<Option<SessionUser>, VenueError> {
        let token = match session_token(req) {
            Some(token) => token,
            None => return Ok(None),
        };

        let user = match UserRepository::find_by_session(pool, &token).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        let profile = UserRepository::get_profile(pool, user.id).await?;

        Ok(Some(SessionUser {
            user,
            profile,
            token,
        }))
    }

    /// Logged-in caller or 401
    pub async fn require_user(pool: &PgPool, req: &HttpRequest) -> Result<SessionUser, VenueError> {
        if session_token(req).is_none() {
            return Err(VenueError::Unauthorized);
        }
        Self::current_user(pool, req)
            .await?
            .ok_or(VenueError::Unauthorized)
    }

    /// Logged-in admin or 401/403
    pub async fn require_admin(
        pool: &PgPool,
        req: &HttpRequest,
    ) -> Result<SessionUser, VenueError> {
        let caller = Self::require_user(pool, req).await?;
        if !caller.is_admin() {
            log::warn!("Non-admin {} tried to access {}", caller.user.username, req.path());
            return Err(VenueError::Forbidden);
        }
        Ok(caller)
    }

    pub async fn profile(pool: &PgPool, caller: &SessionUser) -> Result<ProfileResponse, VenueError> {
        let ratings = RatingRepository::list_by_user(pool, caller.user.id).await?;
        Ok(Self::profile_response(caller, &caller.profile, ratings))
    }

    pub async fn update_profile(
        pool: &PgPool,
        caller: &SessionUser,
        req: UpdateProfileRequest,
    ) -> Result<ProfileResponse, VenueError> {
        req.validate()?;
        let profile = UserRepository::update_profile(pool, caller.user.id, &req).await?;
        let ratings = RatingRepository::list_by_user(pool, caller.user.id).await?;
        log::info!("Profile updated for {}", caller.user.username);
        Ok(Self::profile_response(caller, &profile, ratings))
    }

    /// Store a new avatar and drop the previous file
    pub async fn upload_avatar(
        pool: &PgPool,
        storage: &MediaStorage,
        caller: &SessionUser,
        extension: &str,
        bytes: &[u8],
    ) -> Result<ProfileResponse, VenueError> {
        let path = storage.save(AVATARS_DIR, extension, bytes).await?;
        let previous = match UserRepository::set_avatar(pool, caller.user.id, &path).await {
            Ok(previous) => previous,
            Err(e) => {
                storage.delete(&path).await;
                return Err(e);
            }
        };
        if let Some(old) = previous {
            storage.delete(&old).await;
        }

        let profile = UserRepository::get_profile(pool, caller.user.id).await?;
        let ratings = RatingRepository::list_by_user(pool, caller.user.id).await?;
        Ok(Self::profile_response(caller, &profile, ratings))
    }

    fn profile_response(
        caller: &SessionUser,
        profile: &UserProfile,
        ratings: Vec<Rating>,
    ) -> ProfileResponse {
        ProfileResponse {
            user: caller.user.to_response(profile.is_admin),
            avatar_url: profile.avatar_url(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            date_of_birth: profile.date_of_birth,
            phone: profile.phone.clone(),
            updated_at: profile.updated_at,
            ratings: ratings.iter().map(|r| r.to_response()).collect(),
        }
    }

    /// Create an admin account or promote an existing one, resetting its password
    pub async fn create_admin(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(Uuid, bool), VenueError> {
        let password_hash = hash_password(password)?;

        if let Some(existing) = UserRepository::find_by_username(pool, username).await? {
            UserRepository::set_password(pool, existing.id, &password_hash).await?;
            UserRepository::set_admin(pool, existing.id, true).await?;
            return Ok((existing.id, false));
        }

        let (user, _) =
            UserRepository::create_with_profile(pool, username, email, &password_hash, true).await?;
        StatisticsService::refresh(pool).await;
        Ok((user.id, true))
    }
}

/// Periodically delete expired sessions
pub fn start_session_purge_task(pool: PgPool, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            match UserRepository::purge_expired_sessions(&pool).await {
                Ok(0) => {}
                Ok(purged) => log::info!("Purged {} expired sessions", purged),
                Err(e) => log::warn!("Session purge failed: {}", e),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_session_token_shape() {
        let token = new_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, new_session_token());
    }

    #[test]
    fn test_session_token_from_cookie() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "abc123"))
            .to_http_request();
        assert_eq!(session_token(&req), Some("abc123".to_string()));
    }

    #[test]
    fn test_session_token_from_bearer() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer xyz"))
            .to_http_request();
        assert_eq!(session_token(&req), Some("xyz".to_string()));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic xyz"))
            .to_http_request();
        assert_eq!(session_token(&req), None);
    }

    #[test]
    fn test_no_session_token() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(session_token(&req), None);
    }
}
