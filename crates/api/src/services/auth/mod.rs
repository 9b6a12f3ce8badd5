//! Authentication service.
//!
//! Handles registration, password login, and stateless JWT bearer tokens.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use prime_drip_core::Email;

use crate::config::JwtConfig;
use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{Role, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// JWT claims carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    /// User email at issue time.
    pub email: String,
    /// Roles granted to the user at issue time.
    pub roles: Vec<Role>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issued-at unix timestamp.
    pub iat: i64,
}

/// Outcome of a successful login: the user, their roles, and a signed token.
#[derive(Debug)]
pub struct LoginOutcome {
    pub user: User,
    pub roles: Vec<Role>,
    pub token: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    jwt: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, jwt: &'a JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Register a new user with the default customer role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
        active: bool,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_role(name, &email, phone, &password_hash, active, Role::User)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password, issuing a signed bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash, roles) = self
            .users
            .get_auth_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = issue_token(&user, &roles, self.jwt)?;

        Ok(LoginOutcome { user, roles, token })
    }
}

/// Sign a token for the given user and roles.
///
/// # Errors
///
/// Returns `AuthError::TokenGeneration` if encoding fails.
pub fn issue_token(user: &User, roles: &[Role], jwt: &JwtConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    #[allow(clippy::cast_possible_wrap)] // Configured expiries fit in i64
    let claims = Claims {
        sub: user.id.as_i64(),
        email: user.email.as_str().to_owned(),
        roles: roles.to_vec(),
        exp: now + jwt.expiry_secs as i64,
        iat: now,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt.secret.expose_secret().as_bytes()),
    )
    .map_err(|_| AuthError::TokenGeneration)
}

/// Decode and verify a bearer token, returning its claims.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is expired, malformed, or
/// signed with a different key.
pub fn verify_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AuthError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt.secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
