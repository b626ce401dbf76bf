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
    dtos::status_dto::DeleteStatus,
    error::AppError,
    models::{dislike_model::Dislike, tuit_model::Tuit, user_model::User},
    services::db::{find_by_ids, Database},
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait DislikeDao: Send + Sync {
    async fn find_all_users_that_disliked_tuit(&self, tid: ObjectId)
        -> Result<Vec<User>, AppError>;

    async fn find_all_tuits_disliked_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError>;

    async fn user_dislikes_tuit(&self, uid: ObjectId, tid: ObjectId)
        -> Result<Dislike, AppError>;

    async fn user_undislikes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<DeleteStatus, AppError>;

    async fn find_user_dislikes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<Dislike>, AppError>;

    async fn count_how_many_disliked_tuit(&self, tid: ObjectId) -> Result<u64, AppError>;
}

pub struct MongoDislikeDao {
    dislikes: Collection<Dislike>,
    users: Collection<User>,
    tuits: Collection<Tuit>,
}

impl MongoDislikeDao {
    pub fn new(db: &Database) -> Self {
        MongoDislikeDao {
            dislikes: db.dislikes(),
            users: db.users(),
            tuits: db.tuits(),
        }
    }

    async fn find_dislikes(&self, filter: Document) -> Result<Vec<Dislike>, AppError> {
        Ok(self.dislikes.find(filter).await?.try_collect().await?)
    }
}

#[async_trait]
impl DislikeDao for MongoDislikeDao {
    async fn find_all_users_that_disliked_tuit(
        &self,
        tid: ObjectId,
    ) -> Result<Vec<User>, AppError> {
        let dislikes = self.find_dislikes(doc! { "tuit": tid }).await?;
        let uids: Vec<ObjectId> = dislikes.iter().map(|d| d.disliked_by).collect();
        find_by_ids(&self.users, &uids, |u| u.id).await
    }

    async fn find_all_tuits_disliked_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError> {
        let dislikes = self.find_dislikes(doc! { "dislikedBy": uid }).await?;
        let tids: Vec<ObjectId> = dislikes.iter().map(|d| d.tuit).collect();
        find_by_ids(&self.tuits, &tids, |t| t.id).await
    }

    async fn user_dislikes_tuit(&self, uid: ObjectId, tid: ObjectId) -> Result<Dislike, AppError> {
        let dislike = Dislike {
            id: ObjectId::new(),
            tuit: tid,
            disliked_by: uid,
        };
        self.dislikes.insert_one(&dislike).await?;
        debug!(%uid, %tid, "disliked tuit");
        Ok(dislike)
    }

    async fn user_undislikes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<DeleteStatus, AppError> {
        Ok(self
            .dislikes
            .delete_one(doc! { "tuit": tid, "dislikedBy": uid })
            .await?
            .into())
    }

    async fn find_user_dislikes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<Dislike>, AppError> {
        Ok(self
            .dislikes
            .find_one(doc! { "tuit": tid, "dislikedBy": uid })
            .await?)
    }

    async fn count_how_many_disliked_tuit(&self, tid: ObjectId) -> Result<u64, AppError> {
        Ok(self.dislikes.count_documents(doc! { "tuit": tid }).await?)
    }
}
