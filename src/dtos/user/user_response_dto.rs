use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::user_model::{AccountType, Location, MaritalStatus, User};

/// Public view of a user document. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    pub account_type: AccountType,
    pub marital_status: MaritalStatus,
    pub joined: DateTime<Utc>,
    pub location: Location,
    pub bookmarks: Vec<String>,
    pub followers: Vec<String>,
    pub followees: Vec<String>,
}

impl UserResponseDto {
    pub fn filter_user(user: &User) -> Self {
        UserResponseDto {
            id: user.id.to_hex(),
            username: user.username.to_owned(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            email: user.email.to_owned(),
            profile_photo: user.profile_photo.to_owned(),
            header_image: user.header_image.to_owned(),
            biography: user.biography.to_owned(),
            date_of_birth: user.date_of_birth.map(|dob| dob.to_chrono()),
            salary: user.salary,
            account_type: user.account_type,
            marital_status: user.marital_status,
            joined: user.joined.to_chrono(),
            location: user.location,
            bookmarks: user.bookmarks.iter().map(|id| id.to_hex()).collect(),
            followers: user.followers.iter().map(|id| id.to_hex()).collect(),
            followees: user.followees.iter().map(|id| id.to_hex()).collect(),
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<Self> {
        users.iter().map(UserResponseDto::filter_user).collect()
    }
}
