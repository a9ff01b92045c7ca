//! Account registration and login for users, owners and admins

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, QueryTrait, Set, SqlErr,
};
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::entities::prelude::{Admins, Bookings, Owners, Rooms, Users};
use crate::entities::{admins, bookings, owners, rooms, users};
use crate::services::auth::{AuthError, Role, hash_password, issue_token, verify_password};

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0} already has an account")]
    EmailTaken(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid password")]
    WrongPassword,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile_no: String,
    pub role: Option<String>,
}

/// A user account with its booking count
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: users::Model,
    pub total_bookings: u64,
}

/// An owner account with its room count and the bookings across those rooms
#[derive(Debug, Clone)]
pub struct OwnerProfile {
    pub owner: owners::Model,
    pub total_rooms: u64,
    pub total_bookings: u64,
}

#[derive(Debug, Clone)]
pub struct NewOwner {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_credentials(email: &str, password: &str) -> Result<(), AccountError> {
    if !is_valid_email(email) {
        return Err(AccountError::Invalid("Invalid email format".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AccountError::Invalid(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Maps a unique-index violation on insert to [`AccountError::EmailTaken`].
fn map_insert_error(err: DbErr, who: &'static str) -> AccountError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AccountError::EmailTaken(who),
        _ => AccountError::Database(err),
    }
}

pub async fn register_user(
    db: &DatabaseConnection,
    config: &AppConfig,
    new_user: NewUser,
) -> Result<users::Model, AccountError> {
    let email = normalize_email(&new_user.email);
    check_credentials(&email, &new_user.password)?;

    if Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        return Err(AccountError::EmailTaken("User"));
    }

    let password_hash = hash_password(new_user.password, config.bcrypt_cost).await?;

    let user = users::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        mobile_no: Set(new_user.mobile_no),
        role: Set(new_user.role.unwrap_or_else(|| "user".to_string())),
        profile_pic_url: Set(None),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_insert_error(e, "User"))?;

    info!(user_id = user.id, "User registered");
    Ok(user)
}

pub async fn login_user(
    db: &DatabaseConnection,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<(users::Model, String), AccountError> {
    let user = Users::find()
        .filter(users::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?
        .ok_or(AccountError::NotFound("User"))?;

    if !verify_password(password.to_string(), user.password_hash.clone()).await? {
        return Err(AccountError::WrongPassword);
    }

    let token = issue_token(Role::User, user.id, &config.jwt.user, config.token_ttl_hours)?;
    info!(user_id = user.id, "User logged in");
    Ok((user, token))
}

pub async fn register_owner(
    db: &DatabaseConnection,
    config: &AppConfig,
    new_owner: NewOwner,
) -> Result<owners::Model, AccountError> {
    let email = normalize_email(&new_owner.email);
    check_credentials(&email, &new_owner.password)?;

    if Owners::find()
        .filter(owners::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        return Err(AccountError::EmailTaken("Owner"));
    }

    let password_hash = hash_password(new_owner.password, config.bcrypt_cost).await?;

    let owner = owners::ActiveModel {
        username: Set(new_owner.username.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_insert_error(e, "Owner"))?;

    info!(owner_id = owner.id, "Owner registered");
    Ok(owner)
}

pub async fn login_owner(
    db: &DatabaseConnection,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<(owners::Model, String), AccountError> {
    let owner = Owners::find()
        .filter(owners::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?
        .ok_or(AccountError::NotFound("Owner"))?;

    if !verify_password(password.to_string(), owner.password_hash.clone()).await? {
        return Err(AccountError::WrongPassword);
    }

    let token = issue_token(Role::Owner, owner.id, &config.jwt.owner, config.token_ttl_hours)?;
    info!(owner_id = owner.id, "Owner logged in");
    Ok((owner, token))
}

/// Admins have no public registration; this backs the `create_admin` binary.
pub async fn create_admin(
    db: &DatabaseConnection,
    bcrypt_cost: u32,
    username: &str,
    email: &str,
    password: &str,
) -> Result<admins::Model, AccountError> {
    let email = normalize_email(email);
    check_credentials(&email, password)?;

    let password_hash = hash_password(password.to_string(), bcrypt_cost).await?;

    let admin = admins::ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| map_insert_error(e, "Admin"))?;

    info!(admin_id = admin.id, "Admin created");
    Ok(admin)
}

/// Unknown email and wrong password are indistinguishable for admins.
pub async fn login_admin(
    db: &DatabaseConnection,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<(admins::Model, String), AccountError> {
    let admin = Admins::find()
        .filter(admins::Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    if !verify_password(password.to_string(), admin.password_hash.clone()).await? {
        return Err(AccountError::InvalidCredentials);
    }

    let token = issue_token(Role::Admin, admin.id, &config.jwt.admin, config.token_ttl_hours)?;
    info!(admin_id = admin.id, "Admin logged in");
    Ok((admin, token))
}

pub async fn user_profile(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<UserProfile, AccountError> {
    let user = Users::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(AccountError::NotFound("User"))?;

    let total_bookings = Bookings::find()
        .filter(bookings::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    Ok(UserProfile {
        user,
        total_bookings,
    })
}

pub async fn owner_profile(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<OwnerProfile, AccountError> {
    let owner = Owners::find_by_id(owner_id)
        .one(db)
        .await?
        .ok_or(AccountError::NotFound("Owner"))?;

    let total_rooms = Rooms::find()
        .filter(rooms::Column::CreatorId.eq(owner_id))
        .count(db)
        .await?;

    let owned_room_ids = Rooms::find()
        .select_only()
        .column(rooms::Column::Id)
        .filter(rooms::Column::CreatorId.eq(owner_id))
        .into_query();

    let total_bookings = Bookings::find()
        .filter(bookings::Column::RoomId.in_subquery(owned_room_ids))
        .count(db)
        .await?;

    Ok(OwnerProfile {
        owner,
        total_rooms,
        total_bookings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("tenant@example.com"));
        assert!(!is_valid_email("tenant@example"));
        assert!(!is_valid_email("tenant example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_short_password_rejected() {
        let err = check_credentials("a@b.co", "12345").unwrap_err();
        assert!(matches!(err, AccountError::Invalid(_)));
    }

    #[test]
    fn test_email_taken_message() {
        assert_eq!(
            AccountError::EmailTaken("User").to_string(),
            "User already has an account"
        );
    }
}
