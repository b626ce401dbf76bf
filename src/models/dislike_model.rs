use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dislike {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub tuit: ObjectId,
    pub disliked_by: ObjectId,
}
