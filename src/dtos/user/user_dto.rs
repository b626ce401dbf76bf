use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::user_model::{AccountType, Location, MaritalStatus, User},
};

#[derive(Debug, Validate, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "Username is required"))]
    #[serde(default)]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile_photo: Option<String>,
    pub header_image: Option<String>,
    pub biography: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub salary: Option<f64>,
    pub account_type: Option<AccountType>,
    pub marital_status: Option<MaritalStatus>,
    pub location: Option<Location>,
}

impl CreateUserDto {
    pub fn into_user(self, hashed_password: String) -> User {
        let mut user = User::new(self.username, hashed_password);
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.email = self.email;
        user.profile_photo = self.profile_photo;
        user.header_image = self.header_image;
        user.biography = self.biography;
        user.date_of_birth = self.date_of_birth.map(bson::DateTime::from_chrono);
        user.salary = self.salary;
        user.account_type = self.account_type.unwrap_or_default();
        user.marital_status = self.marital_status.unwrap_or_default();
        user.location = self.location.unwrap_or_default();
        user
    }
}

/// Body of `PUT /api/users/{uid}`. Only the fields present are written.
/// Relationship lists are managed by their own routes and cannot be set here.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub profile_photo: Option<String>,
    pub header_image: Option<String>,
    pub biography: Option<String>,
    pub date_of_birth: Option<DateTime<Utc>>,
    pub salary: Option<f64>,
    pub account_type: Option<AccountType>,
    pub marital_status: Option<MaritalStatus>,
    pub location: Option<Location>,
}

impl UpdateUserDto {
    pub fn to_set_document(&self) -> Result<Document, AppError> {
        let mut set = Document::new();
        let strings = [
            ("username", &self.username),
            ("password", &self.password),
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("email", &self.email),
            ("profilePhoto", &self.profile_photo),
            ("headerImage", &self.header_image),
            ("biography", &self.biography),
        ];
        for (field, value) in strings {
            if let Some(value) = value {
                set.insert(field, value.as_str());
            }
        }
        if let Some(dob) = self.date_of_birth {
            set.insert("dateOfBirth", bson::DateTime::from_chrono(dob));
        }
        if let Some(salary) = self.salary {
            set.insert("salary", salary);
        }
        if let Some(account_type) = &self.account_type {
            set.insert("accountType", bson::to_bson(account_type)?);
        }
        if let Some(marital_status) = &self.marital_status {
            set.insert("maritalStatus", bson::to_bson(marital_status)?);
        }
        if let Some(location) = &self.location {
            set.insert("location", bson::to_bson(location)?);
        }
        Ok(set)
    }
}
