use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::user_model::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub message: String,
    pub from: ObjectId,
    pub to: ObjectId,
    #[serde(default = "DateTime::now")]
    pub sent_on: DateTime,
}

#[derive(Debug, Clone)]
pub struct PopulatedMessage {
    pub message: Message,
    pub from: Option<User>,
    pub to: Option<User>,
}
