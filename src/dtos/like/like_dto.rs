use serde::Serialize;

use crate::models::{dislike_model::Dislike, like_model::Like};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponseDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub tuit: String,
    pub liked_by: String,
}

impl LikeResponseDto {
    pub fn filter_like(like: &Like) -> Self {
        LikeResponseDto {
            id: like.id.to_hex(),
            tuit: like.tuit.to_hex(),
            liked_by: like.liked_by.to_hex(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DislikeResponseDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub tuit: String,
    pub disliked_by: String,
}

impl DislikeResponseDto {
    pub fn filter_dislike(dislike: &Dislike) -> Self {
        DislikeResponseDto {
            id: dislike.id.to_hex(),
            tuit: dislike.tuit.to_hex(),
            disliked_by: dislike.disliked_by.to_hex(),
        }
    }
}
