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
    models::{like_model::Like, tuit_model::Tuit, user_model::User},
    services::db::{find_by_ids, Database},
};

/// Like records join users to tuits. Nothing here prevents a second like of
/// the same tuit by the same user; callers check with `find_user_likes_tuit`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LikeDao: Send + Sync {
    async fn find_all_users_that_liked_tuit(&self, tid: ObjectId) -> Result<Vec<User>, AppError>;

    async fn find_all_tuits_liked_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError>;

    async fn user_likes_tuit(&self, uid: ObjectId, tid: ObjectId) -> Result<Like, AppError>;

    async fn user_unlikes_tuit(&self, uid: ObjectId, tid: ObjectId)
        -> Result<DeleteStatus, AppError>;

    async fn find_user_likes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<Like>, AppError>;

    async fn count_how_many_liked_tuit(&self, tid: ObjectId) -> Result<u64, AppError>;
}

pub struct MongoLikeDao {
    likes: Collection<Like>,
    users: Collection<User>,
    tuits: Collection<Tuit>,
}

impl MongoLikeDao {
    pub fn new(db: &Database) -> Self {
        MongoLikeDao {
            likes: db.likes(),
            users: db.users(),
            tuits: db.tuits(),
        }
    }

    async fn find_likes(&self, filter: Document) -> Result<Vec<Like>, AppError> {
        Ok(self.likes.find(filter).await?.try_collect().await?)
    }
}

#[async_trait]
impl LikeDao for MongoLikeDao {
    async fn find_all_users_that_liked_tuit(&self, tid: ObjectId) -> Result<Vec<User>, AppError> {
        let likes = self.find_likes(doc! { "tuit": tid }).await?;
        let uids: Vec<ObjectId> = likes.iter().map(|like| like.liked_by).collect();
        find_by_ids(&self.users, &uids, |u| u.id).await
    }

    async fn find_all_tuits_liked_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError> {
        let likes = self.find_likes(doc! { "likedBy": uid }).await?;
        let tids: Vec<ObjectId> = likes.iter().map(|like| like.tuit).collect();
        find_by_ids(&self.tuits, &tids, |t| t.id).await
    }

    async fn user_likes_tuit(&self, uid: ObjectId, tid: ObjectId) -> Result<Like, AppError> {
        let like = Like {
            id: ObjectId::new(),
            tuit: tid,
            liked_by: uid,
        };
        self.likes.insert_one(&like).await?;
        debug!(%uid, %tid, "liked tuit");
        Ok(like)
    }

    async fn user_unlikes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<DeleteStatus, AppError> {
        let result = self
            .likes
            .delete_one(doc! { "tuit": tid, "likedBy": uid })
            .await?;
        debug!(%uid, %tid, deleted = result.deleted_count, "unliked tuit");
        Ok(result.into())
    }

    async fn find_user_likes_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<Like>, AppError> {
        Ok(self
            .likes
            .find_one(doc! { "tuit": tid, "likedBy": uid })
            .await?)
    }

    async fn count_how_many_liked_tuit(&self, tid: ObjectId) -> Result<u64, AppError> {
        Ok(self.likes.count_documents(doc! { "tuit": tid }).await?)
    }
}
