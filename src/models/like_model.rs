use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One row per (user, tuit) like. Nothing in the store keeps these unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tuit: ObjectId,
    pub liked_by: ObjectId,
}
