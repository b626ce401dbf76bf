use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::user_model::User;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub replies: i64,
    #[serde(default)]
    pub retuits: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tuit {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tuit: String,
    #[serde(default = "DateTime::now")]
    pub posted_on: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_overlay: Option<String>,
    #[serde(default)]
    pub stats: Stats,
}

/// A tuit with its `postedBy` reference resolved to the poster's document.
#[derive(Debug, Clone)]
pub struct PopulatedTuit {
    pub tuit: Tuit,
    pub posted_by: Option<User>,
}
