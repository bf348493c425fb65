use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{self, AuthError, IssuedToken};
use crate::config::AppConfig;
use crate::database::models::{NewUser, User};
use crate::database::CourseStore;
use crate::types::Role;

use super::error::{DomainError, DomainResult};
use super::validate::required_text;

const MIN_PASSWORD_LEN: usize = 8;
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Account creation, login and startup bootstrap
pub struct AccountService {
    store: Arc<dyn CourseStore>,
    config: Arc<AppConfig>,
}

/// Successful login: the signed token and the user it was issued for
#[derive(Debug, Clone)]
pub struct Session {
    pub token: IssuedToken,
    pub user: User,
}

impl AccountService {
    pub fn new(store: Arc<dyn CourseStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Self-service sign up; always creates a student
    pub async fn register_student(&self, name: &str, email: &str, password: &str) -> DomainResult<User> {
        self.create_account(name, email, password, Role::Student).await
    }

    pub async fn create_account(&self, name: &str, email: &str, password: &str, role: Role) -> DomainResult<User> {
        let name = required_text("name", name)?;
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::validation(
                "password",
                format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }

        let password_hash = self.hash(password.to_string()).await?;
        let user = self
            .store
            .insert_user(NewUser { name, email, password_hash, role })
            .await?;
        info!("Created {} account {} ({})", user.role, user.user_id, user.email);
        Ok(user)
    }

    /// Verify credentials and issue a token. Unknown email and wrong password
    /// fail identically.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.store.find_user_by_email(&email).await? else {
            warn!("Login attempt for unknown email {}", email);
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };

        if !self.verify(password.to_string(), user.password_hash.clone()).await? {
            warn!("Failed login for user {}", user.user_id);
            return Err(DomainError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        let token = auth::generate_jwt(&self.config.security, &user)?;
        info!("User {} logged in", user.user_id);
        Ok(Session { token, user })
    }

    /// Create the configured admin account unless one already exists with that email
    pub async fn bootstrap_admin(&self) -> DomainResult<Option<User>> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap.admin_email.as_deref(),
            self.config.bootstrap.admin_password.as_deref(),
        ) else {
            return Ok(None);
        };

        if self.store.find_user_by_email(&email.trim().to_lowercase()).await?.is_some() {
            info!("Bootstrap admin {} already present", email);
            return Ok(None);
        }

        let user = self.create_account("Administrator", email, password, Role::Admin).await?;
        Ok(Some(user))
    }

    async fn hash(&self, password: String) -> DomainResult<String> {
        let cost = self.config.security.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || auth::hash_password(&password, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify(&self, password: String, hash: String) -> DomainResult<bool> {
        let verified = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        // A malformed stored hash is treated as a failed match
        Ok(verified.unwrap_or(false))
    }
}

fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email", "email must be a valid address"));
    }
    Ok(email)
}
