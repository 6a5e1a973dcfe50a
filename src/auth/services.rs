pub(crate) use crate::auth::dto::{AuthResponse, Claims, JwtKeys, PublicUser};
use crate::auth::repo_types::User;
use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time verification. A digest that does not parse is treated the
/// same as a mismatch, so callers never branch on digest shape.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "malformed password digest");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_days,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            session_ttl: Duration::from_secs((ttl_days as u64) * 24 * 60 * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign_session(&self, user_id: Uuid, email: &str, name: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.session_ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            name: name.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session verified");
        Ok(data.claims)
    }
}

/// Sign-in: trims the email, uniformizes "unknown email" and "wrong
/// password" into one error, and issues a session on success.
pub async fn sign_in(state: &AppState, email: &str, password: &str) -> AppResult<AuthResponse> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "sign-in invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys
        .sign_session(user.id, &user.email, &user.name)
        .map_err(|e| AppError::storage("Something went wrong. Please try again.", e))?;

    info!(user_id = %user.id, "user signed in");
    Ok(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    })
}

/// Sign-up: validates the fields, creates the account, then runs the normal
/// sign-in with the same credentials. The overall result is the sign-in
/// result, so a reported success always carries a usable session.
pub async fn sign_up(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> AppResult<AuthResponse> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err(AppError::validation("name", "Name is required"));
    }
    if !is_valid_email(email) {
        return Err(AppError::validation("email", "Invalid email address"));
    }
    if password.len() < 8 {
        return Err(AppError::validation(
            "password",
            "Password must be at least 8 characters",
        ));
    }

    // Fast path only; the unique constraint on insert is the real guard
    // against a concurrent sign-up with the same email.
    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!("sign-up email already registered");
        return Err(AppError::AccountExists);
    }

    let hash = hash_password(password)
        .map_err(|e| AppError::storage("Failed to create an account.", e))?;
    let user = User::create(&state.db, name, email, &hash).await?;
    info!(user_id = %user.id, "user registered");

    sign_in(state, email, password).await
}

/// The caller's identity, resolved from the verified session claims.
/// Every task handler takes this as its first extractor, so no task
/// operation can run without it.
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(AppError::Unauthorized);
            }
        };

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}


#[cfg(test)]
mod email_tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }
}


#[cfg(test)]
mod flow_tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_rejects_empty_credentials_without_store_access() {
        // The fake state's pool is lazy: reaching the store would fail, so
        // passing proves the empty-field check short-circuits first.
        let state = AppState::fake();
        let err = sign_in(&state, "", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        let err = sign_in(&state, "   ", "secret123").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        let err = sign_in(&state, "a@example.com", "").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn sign_up_validates_fields_before_touching_the_store() {
        let state = AppState::fake();

        let err = sign_up(&state, "  ", "a@example.com", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "name", .. }));

        let err = sign_up(&state, "Alice", "not-an-email", "secret123")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { field: "email", .. }));

        let err = sign_up(&state, "Alice", "a@example.com", "short")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation {
                field: "password",
                ..
            }
        ));
    }
}
