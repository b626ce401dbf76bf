use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    dtos::user::user_response_dto::UserResponseDto,
    models::tuit_model::{PopulatedTuit, Stats, Tuit},
};

/// A tuit as sent to clients. `P` is the shape of `postedBy`: the poster's id
/// as a hex string, or the poster's whole user view when populated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TuitResponseDto<P> {
    #[serde(rename = "_id")]
    pub id: String,
    pub tuit: String,
    pub posted_on: DateTime<Utc>,
    pub posted_by: Option<P>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_overlay: Option<String>,
    pub stats: Stats,
}

impl<P> TuitResponseDto<P> {
    fn with_poster(tuit: &Tuit, posted_by: Option<P>) -> Self {
        TuitResponseDto {
            id: tuit.id.to_hex(),
            tuit: tuit.tuit.to_owned(),
            posted_on: tuit.posted_on.to_chrono(),
            posted_by,
            youtube: tuit.youtube.to_owned(),
            avatar_logo: tuit.avatar_logo.to_owned(),
            image_overlay: tuit.image_overlay.to_owned(),
            stats: tuit.stats,
        }
    }
}

impl TuitResponseDto<String> {
    pub fn filter_tuit(tuit: &Tuit) -> Self {
        Self::with_poster(tuit, tuit.posted_by.map(|id| id.to_hex()))
    }

    pub fn filter_tuits(tuits: &[Tuit]) -> Vec<Self> {
        tuits.iter().map(Self::filter_tuit).collect()
    }
}

impl TuitResponseDto<UserResponseDto> {
    pub fn filter_populated(populated: &PopulatedTuit) -> Self {
        Self::with_poster(
            &populated.tuit,
            populated.posted_by.as_ref().map(UserResponseDto::filter_user),
        )
    }
}
