use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, UserView},
        password::{hash_password_blocking, verify_password_blocking},
        repo::UserRepo,
        repo_types::{NewUser, Role, User},
    },
    error::{AppError, AppResult},
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Display name and credential given to auto-provisioned admin accounts.
pub const ADMIN_DISPLAY_NAME: &str = "Admin User";
pub const ADMIN_PLACEHOLDER_PASSWORD: &str = "defaultpassword";

/// Checks a registration form without touching storage.
pub fn validate_registration(req: &RegisterRequest) -> AppResult<()> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if req.password != req.confirm_password {
        return Err(AppError::Validation("Passwords do not match".into()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Creates a plain user. `email` is stored exactly as given; it is the lookup key.
#[instrument(skip(users, req), fields(email = %req.email))]
pub async fn register_user(users: &dyn UserRepo, req: RegisterRequest) -> AppResult<User> {
    validate_registration(&req)?;
    let name = req.name.trim();
    let email = req.email.as_str();

    if users.find_by_email(email).await?.is_some() {
        warn!("email already registered");
        return Err(AppError::Conflict);
    }

    let hash = hash_password_blocking(req.password).await?;
    let created = users
        .create(&NewUser {
            name,
            email,
            password_hash: &hash,
            role: Role::User,
        })
        .await?;

    // The unique index catches a registration that raced past the pre-check.
    let user = created.ok_or_else(|| {
        warn!("email registered concurrently");
        AppError::Conflict
    })?;
    info!(user_id = %user.id, "user registered");
    Ok(user)
}

/// Verifies credentials. Unknown email and wrong password fail identically.
#[instrument(skip(users, req), fields(email = %req.email))]
pub async fn authenticate_user(users: &dyn UserRepo, req: LoginRequest) -> AppResult<User> {
    let email = req.email.as_str();
    if email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Email and password are required".into()));
    }

    let Some(user) = users.find_by_email(email).await? else {
        warn!("login unknown email");
        return Err(AppError::Auth);
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Auth);
    }

    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Resolves `email` to a user, provisioning an admin account when none exists.
///
/// Lookup first, then the store's atomic insert-or-fetch, so concurrent
/// callers converge on a single row.
#[instrument(skip(users))]
pub async fn ensure_admin(users: &dyn UserRepo, email: &str) -> AppResult<User> {
    if let Some(user) = users.find_by_email(email).await? {
        return Ok(user);
    }

    let hash = hash_password_blocking(ADMIN_PLACEHOLDER_PASSWORD.to_string()).await?;
    let user = users
        .insert_or_fetch(&NewUser {
            name: ADMIN_DISPLAY_NAME,
            email,
            password_hash: &hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %user.id, role = user.role.as_str(), "uploader resolved");
    Ok(user)
}

pub async fn list_users(users: &dyn UserRepo) -> AppResult<Vec<UserView>> {
    let all = users.list_newest_first().await?;
    Ok(all.into_iter().map(UserView::from).collect())
}
