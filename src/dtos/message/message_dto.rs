use chrono::{DateTime, Utc};
use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    dtos::user::user_response_dto::UserResponseDto,
    models::message_model::{Message, PopulatedMessage},
};

/// Body of a send. Sender and receiver come from the route; any `from`/`to`
/// in the body is ignored.
#[derive(Debug, Validate, Default, Clone, Deserialize)]
pub struct SendMessageDto {
    #[validate(length(min = 1, message = "Message text is required"))]
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UpdateMessageDto {
    pub message: Option<String>,
}

impl UpdateMessageDto {
    pub fn to_set_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(message) = &self.message {
            set.insert("message", message.as_str());
        }
        set
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponseDto<P> {
    #[serde(rename = "_id")]
    pub id: String,
    pub message: String,
    pub from: P,
    pub to: P,
    pub sent_on: DateTime<Utc>,
}

fn hex(id: &ObjectId) -> String {
    id.to_hex()
}

impl MessageResponseDto<String> {
    pub fn filter_message(message: &Message) -> Self {
        MessageResponseDto {
            id: hex(&message.id),
            message: message.message.to_owned(),
            from: hex(&message.from),
            to: hex(&message.to),
            sent_on: message.sent_on.to_chrono(),
        }
    }
}

impl MessageResponseDto<Option<UserResponseDto>> {
    pub fn filter_populated(populated: &PopulatedMessage) -> Self {
        MessageResponseDto {
            id: hex(&populated.message.id),
            message: populated.message.message.to_owned(),
            from: populated.from.as_ref().map(UserResponseDto::filter_user),
            to: populated.to.as_ref().map(UserResponseDto::filter_user),
            sent_on: populated.message.sent_on.to_chrono(),
        }
    }

    pub fn filter_all(populated: &[PopulatedMessage]) -> Vec<Self> {
        populated.iter().map(Self::filter_populated).collect()
    }
}
