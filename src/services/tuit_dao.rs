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
        tuit_model::{PopulatedTuit, Tuit},
        user_model::User,
    },
    services::db::Database,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TuitDao: Send + Sync {
    async fn find_all_tuits(&self) -> Result<Vec<Tuit>, AppError>;

    async fn find_all_tuits_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError>;

    /// The tuit with `postedBy` resolved to the poster's document.
    async fn find_tuit_by_id(&self, tid: ObjectId) -> Result<Option<PopulatedTuit>, AppError>;

    /// Stores `tuit` with `uid` as its poster, whatever `tuit.posted_by` held.
    async fn create_tuit_by_user(&self, uid: ObjectId, tuit: Tuit) -> Result<Tuit, AppError>;

    async fn update_tuit(&self, tid: ObjectId, changes: Document)
        -> Result<UpdateStatus, AppError>;

    async fn delete_tuit(&self, tid: ObjectId) -> Result<DeleteStatus, AppError>;

    async fn set_like_count(&self, tid: ObjectId, likes: u64) -> Result<UpdateStatus, AppError>;

    async fn set_dislike_count(
        &self,
        tid: ObjectId,
        dislikes: u64,
    ) -> Result<UpdateStatus, AppError>;
}

pub struct MongoTuitDao {
    tuits: Collection<Tuit>,
    users: Collection<User>,
}

impl MongoTuitDao {
    pub fn new(db: &Database) -> Self {
        MongoTuitDao {
            tuits: db.tuits(),
            users: db.users(),
        }
    }

    async fn set_stat(&self, tid: ObjectId, stat: &str, value: u64) -> Result<UpdateStatus, AppError> {
        let mut set = Document::new();
        set.insert(format!("stats.{}", stat), i64::try_from(value).unwrap_or(i64::MAX));
        let result = self
            .tuits
            .update_one(doc! { "_id": tid }, doc! { "$set": set })
            .await?;
        Ok(result.into())
    }
}

#[async_trait]
impl TuitDao for MongoTuitDao {
    async fn find_all_tuits(&self) -> Result<Vec<Tuit>, AppError> {
        Ok(self.tuits.find(doc! {}).await?.try_collect().await?)
    }

    async fn find_all_tuits_by_user(&self, uid: ObjectId) -> Result<Vec<Tuit>, AppError> {
        Ok(self
            .tuits
            .find(doc! { "postedBy": uid })
            .await?
            .try_collect()
            .await?)
    }

    async fn find_tuit_by_id(&self, tid: ObjectId) -> Result<Option<PopulatedTuit>, AppError> {
        let Some(tuit) = self.tuits.find_one(doc! { "_id": tid }).await? else {
            return Ok(None);
        };
        let posted_by = match tuit.posted_by {
            Some(uid) => self.users.find_one(doc! { "_id": uid }).await?,
            None => None,
        };
        Ok(Some(PopulatedTuit { tuit, posted_by }))
    }

    async fn create_tuit_by_user(&self, uid: ObjectId, mut tuit: Tuit) -> Result<Tuit, AppError> {
        tuit.posted_by = Some(uid);
        self.tuits.insert_one(&tuit).await?;
        debug!(tid = %tuit.id, %uid, "created tuit");
        Ok(tuit)
    }

    async fn update_tuit(
        &self,
        tid: ObjectId,
        changes: Document,
    ) -> Result<UpdateStatus, AppError> {
        if changes.is_empty() {
            let matched = self.tuits.count_documents(doc! { "_id": tid }).await?;
            return Ok(UpdateStatus::new(matched, 0));
        }
        let result = self
            .tuits
            .update_one(doc! { "_id": tid }, doc! { "$set": changes })
            .await?;
        Ok(result.into())
    }

    async fn delete_tuit(&self, tid: ObjectId) -> Result<DeleteStatus, AppError> {
        Ok(self.tuits.delete_one(doc! { "_id": tid }).await?.into())
    }

    async fn set_like_count(&self, tid: ObjectId, likes: u64) -> Result<UpdateStatus, AppError> {
        self.set_stat(tid, "likes", likes).await
    }

    async fn set_dislike_count(
        &self,
        tid: ObjectId,
        dislikes: u64,
    ) -> Result<UpdateStatus, AppError> {
        self.set_stat(tid, "dislikes", dislikes).await
    }
}
