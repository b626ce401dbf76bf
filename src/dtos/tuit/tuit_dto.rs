use mongodb::bson::{self, oid::ObjectId, DateTime, Document};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::tuit_model::{Stats, Tuit},
};

/// Body of a tuit create. There is no `postedBy` field: the poster always comes
/// from the route, so a client-supplied one is dropped during deserialization.
#[derive(Debug, Validate, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTuitDto {
    #[validate(length(min = 1, message = "Tuit text is required"))]
    #[serde(default)]
    pub tuit: String,
    pub youtube: Option<String>,
    pub avatar_logo: Option<String>,
    pub image_overlay: Option<String>,
}

impl CreateTuitDto {
    pub fn into_tuit(self) -> Tuit {
        Tuit {
            id: ObjectId::new(),
            tuit: self.tuit,
            posted_on: DateTime::now(),
            posted_by: None,
            youtube: self.youtube,
            avatar_logo: self.avatar_logo,
            image_overlay: self.image_overlay,
            stats: Stats::default(),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTuitDto {
    pub tuit: Option<String>,
    pub youtube: Option<String>,
    pub avatar_logo: Option<String>,
    pub image_overlay: Option<String>,
    pub stats: Option<Stats>,
}

impl UpdateTuitDto {
    pub fn to_set_document(&self) -> Result<Document, AppError> {
        let mut set = Document::new();
        let strings = [
            ("tuit", &self.tuit),
            ("youtube", &self.youtube),
            ("avatarLogo", &self.avatar_logo),
            ("imageOverlay", &self.image_overlay),
        ];
        for (field, value) in strings {
            if let Some(value) = value {
                set.insert(field, value.as_str());
            }
        }
        if let Some(stats) = &self.stats {
            set.insert("stats", bson::to_bson(stats)?);
        }
        Ok(set)
    }
}
