use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Personal,
    Academic,
    Professional,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaritalStatus {
    Married,
    #[default]
    Single,
    Widowed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// A document in the `users` collection.
///
/// `bookmarks` holds tuit ids; `followers` and `followees` hold user ids and are
/// kept in step with the other side of each relationship by the user DAO.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub marital_status: MaritalStatus,
    #[serde(default = "DateTime::now")]
    pub joined: DateTime,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub bookmarks: Vec<ObjectId>,
    #[serde(default)]
    pub followers: Vec<ObjectId>,
    #[serde(default)]
    pub followees: Vec<ObjectId>,
}

impl User {
    pub fn new(username: String, password: String) -> Self {
        User {
            id: ObjectId::new(),
            username,
            password,
            first_name: None,
            last_name: None,
            email: None,
            profile_photo: None,
            header_image: None,
            biography: None,
            date_of_birth: None,
            salary: None,
            account_type: AccountType::default(),
            marital_status: MaritalStatus::default(),
            joined: DateTime::now(),
            location: Location::default(),
            bookmarks: Vec::new(),
            followers: Vec::new(),
            followees: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn test_minimal_document_fills_defaults() {
        let id = ObjectId::new();
        let user: User = bson::from_document(doc! {
            "_id": id,
            "username": "alice",
            "password": "secret",
        })
        .unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.account_type, AccountType::Personal);
        assert_eq!(user.marital_status, MaritalStatus::Single);
        assert_eq!(user.location, Location::default());
        assert!(user.bookmarks.is_empty());
        assert!(user.followers.is_empty());
        assert!(user.followees.is_empty());
    }

    #[test]
    fn test_stored_field_names() {
        let mut user = User::new("bob".to_string(), "hash".to_string());
        user.first_name = Some("Bob".to_string());
        user.account_type = AccountType::Academic;

        let stored = bson::to_document(&user).unwrap();
        assert_eq!(stored.get_object_id("_id").unwrap(), user.id);
        assert_eq!(stored.get_str("firstName").unwrap(), "Bob");
        assert_eq!(stored.get_str("accountType").unwrap(), "ACADEMIC");
        assert_eq!(stored.get_str("maritalStatus").unwrap(), "SINGLE");
        assert!(stored.get_array("followees").unwrap().is_empty());
        assert!(!stored.contains_key("lastName"));
    }
}
