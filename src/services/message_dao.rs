use async_trait::async_trait;
use futures_util::TryStreamExt;
#[cfg(test)]
use mockall::automock;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection,
};
use tracing::debug;

use crate::{
    dtos::status_dto::{DeleteStatus, UpdateStatus},
    error::AppError,
    models::{
        message_model::{Message, PopulatedMessage},
        user_model::User,
    },
    services::db::{find_map_by_ids, Database},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageDao: Send + Sync {
    async fn find_messages_sent_by_user(
        &self,
        uid: ObjectId,
    ) -> Result<Vec<PopulatedMessage>, AppError>;

    async fn find_messages_received_by_user(
        &self,
        uid: ObjectId,
    ) -> Result<Vec<PopulatedMessage>, AppError>;

    /// Stores `message` with sender and receiver taken from the arguments.
    async fn send_message_between_users(
        &self,
        sender_id: ObjectId,
        receiver_id: ObjectId,
        message: Message,
    ) -> Result<Message, AppError>;

    async fn delete_message(&self, mid: ObjectId) -> Result<DeleteStatus, AppError>;

    async fn update_message(
        &self,
        mid: ObjectId,
        changes: Document,
    ) -> Result<UpdateStatus, AppError>;

    /// Deletes what the user sent. Messages the user received are kept.
    async fn delete_all_messages_for_user(&self, uid: ObjectId)
        -> Result<DeleteStatus, AppError>;
}

pub struct MongoMessageDao {
    messages: Collection<Message>,
    users: Collection<User>,
}

impl MongoMessageDao {
    pub fn new(db: &Database) -> Self {
        MongoMessageDao {
            messages: db.messages(),
            users: db.users(),
        }
    }

    async fn find_populated(&self, filter: Document) -> Result<Vec<PopulatedMessage>, AppError> {
        let messages: Vec<Message> = self.messages.find(filter).await?.try_collect().await?;

        let mut uids: Vec<ObjectId> = messages.iter().flat_map(|m| [m.from, m.to]).collect();
        uids.sort();
        uids.dedup();
        let users = find_map_by_ids(&self.users, &uids, |u| u.id).await?;

        Ok(messages
            .into_iter()
            .map(|message| PopulatedMessage {
                from: users.get(&message.from).cloned(),
                to: users.get(&message.to).cloned(),
                message,
            })
            .collect())
    }
}

#[async_trait]
impl MessageDao for MongoMessageDao {
    async fn find_messages_sent_by_user(
        &self,
        uid: ObjectId,
    ) -> Result<Vec<PopulatedMessage>, AppError> {
        self.find_populated(doc! { "from": uid }).await
    }

    async fn find_messages_received_by_user(
        &self,
        uid: ObjectId,
    ) -> Result<Vec<PopulatedMessage>, AppError> {
        self.find_populated(doc! { "to": uid }).await
    }

    async fn send_message_between_users(
        &self,
        sender_id: ObjectId,
        receiver_id: ObjectId,
        mut message: Message,
    ) -> Result<Message, AppError> {
        message.from = sender_id;
        message.to = receiver_id;
        self.messages.insert_one(&message).await?;
        debug!(mid = %message.id, %sender_id, %receiver_id, "sent message");
        Ok(message)
    }

    async fn delete_message(&self, mid: ObjectId) -> Result<DeleteStatus, AppError> {
        Ok(self.messages.delete_one(doc! { "_id": mid }).await?.into())
    }

    async fn update_message(
        &self,
        mid: ObjectId,
        changes: Document,
    ) -> Result<UpdateStatus, AppError> {
        if changes.is_empty() {
            let matched = self.messages.count_documents(doc! { "_id": mid }).await?;
            return Ok(UpdateStatus::new(matched, 0));
        }
        let result = self
            .messages
            .update_one(doc! { "_id": mid }, doc! { "$set": changes })
            .await?;
        Ok(result.into())
    }

    async fn delete_all_messages_for_user(
        &self,
        uid: ObjectId,
    ) -> Result<DeleteStatus, AppError> {
        let result = self
            .messages
            .delete_many(doc! { "from": { "$eq": uid } })
            .await?;
        debug!(%uid, deleted = result.deleted_count, "deleted sent messages");
        Ok(result.into())
    }
}
