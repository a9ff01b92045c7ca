//! Request/response models for account registration and login

use serde::{Deserialize, Serialize};

use crate::entities::{admins, owners, users};
use crate::services::accounts::{OwnerProfile, UserProfile};

/// Mobile numbers arrive either as JSON strings or bare numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MobileNo {
    Text(String),
    Number(u64),
}

impl MobileNo {
    pub fn into_string(self) -> String {
        match self {
            MobileNo::Text(s) => s.trim().to_string(),
            MobileNo::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<MobileNo>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterOwnerRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRegisteredResponse {
    pub message: String,
    pub user: users::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRegisteredResponse {
    pub message: String,
    pub owner: owners::Model,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLoginResponse {
    pub message: String,
    pub user_data: users::Model,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLoginResponse {
    pub message: String,
    pub owner_data: owners::Model,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginResponse {
    pub message: String,
    pub admin_data: admins::Model,
    pub token: String,
}

/// Read-only profile for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "mobile_no")]
    pub mobile_no: String,
    pub total_bookings: u64,
    /// `YYYY-MM-DD`
    pub joined_date: String,
    pub profile_image: Option<String>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let user = profile.user;
        Self {
            user_id: user.id,
            joined_date: user.created_at.format("%Y-%m-%d").to_string(),
            name: user.name,
            email: user.email,
            mobile_no: user.mobile_no,
            total_bookings: profile.total_bookings,
            profile_image: user.profile_pic_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfileResponse {
    pub owner_id: i32,
    pub name: String,
    pub email: String,
    pub total_rooms: u64,
    pub total_bookings: u64,
    pub joined_date: String,
}

impl From<OwnerProfile> for OwnerProfileResponse {
    fn from(profile: OwnerProfile) -> Self {
        let owner = profile.owner;
        Self {
            owner_id: owner.id,
            joined_date: owner.created_at.format("%Y-%m-%d").to_string(),
            name: owner.username,
            email: owner.email,
            total_rooms: profile.total_rooms,
            total_bookings: profile.total_bookings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_no_accepts_string_or_number() {
        let req: RegisterUserRequest =
            serde_json::from_value(serde_json::json!({ "mobile_no": 9876543210u64 })).unwrap();
        assert_eq!(req.mobile_no.unwrap().into_string(), "9876543210");

        let req: RegisterUserRequest =
            serde_json::from_value(serde_json::json!({ "mobile_no": " 98765 " })).unwrap();
        assert_eq!(req.mobile_no.unwrap().into_string(), "98765");
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: LoginRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
