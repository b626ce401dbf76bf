use std::future::IntoFuture;

use async_trait::async_trait;
use futures_util::{future::try_join_all, TryStreamExt};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection,
};
#[cfg(test)]
use mockall::automock;
use tracing::{debug, error, warn};

use crate::{
    dtos::status_dto::{DeleteStatus, UpdateStatus},
    error::AppError,
    models::{tuit_model::Tuit, user_model::User},
    services::db::{find_by_ids, Database},
};

/// Storage for users and the relationships kept on user documents:
/// bookmarks, followers and followees.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserDao: Send + Sync {
    async fn find_all_users(&self) -> Result<Vec<User>, AppError>;

    async fn find_user_by_id(&self, uid: ObjectId) -> Result<Option<User>, AppError>;

    async fn find_user_by_username(&self, username: String) -> Result<Option<User>, AppError>;

    async fn create_user(&self, user: User) -> Result<User, AppError>;

    /// Applies `changes` as a field-level `$set`.
    async fn update_user(&self, uid: ObjectId, changes: Document)
        -> Result<UpdateStatus, AppError>;

    async fn delete_user(&self, uid: ObjectId) -> Result<DeleteStatus, AppError>;

    async fn delete_user_by_username(&self, username: String) -> Result<DeleteStatus, AppError>;

    /// `None` when the user does not exist.
    async fn find_bookmarks_for_user(&self, uid: ObjectId) -> Result<Option<Vec<Tuit>>, AppError>;

    /// Appends `tid` without checking for an earlier bookmark of the same tuit.
    async fn create_bookmark_for_user(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<User>, AppError>;

    async fn delete_bookmark_for_user(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError>;

    async fn delete_all_bookmarks_for_user(
        &self,
        uid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError>;

    async fn has_user_bookmarked_tuit(&self, uid: ObjectId, tid: ObjectId)
        -> Result<bool, AppError>;

    /// Fails with `NotFound` when either user is missing.
    async fn user_follows_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<UpdateStatus, AppError>;

    async fn user_unfollows_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<UpdateStatus, AppError>;

    async fn find_all_followers_for_user(&self, uid: ObjectId) -> Result<Vec<User>, AppError>;

    async fn find_all_followees_for_user(&self, uid: ObjectId) -> Result<Vec<User>, AppError>;

    async fn does_user_follow_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<bool, AppError>;

    async fn delete_all_followees_for_user(
        &self,
        uid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError>;
}

pub struct MongoUserDao {
    users: Collection<User>,
    tuits: Collection<Tuit>,
}

impl MongoUserDao {
    pub fn new(db: &Database) -> Self {
        MongoUserDao {
            users: db.users(),
            tuits: db.tuits(),
        }
    }

    async fn find_pair(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<(User, User), AppError> {
        let (follower, followee) = tokio::try_join!(
            self.find_user_by_id(follower_id),
            self.find_user_by_id(followee_id)
        )?;
        match (follower, followee) {
            (Some(follower), Some(followee)) => Ok((follower, followee)),
            _ => Err(AppError::NotFound("Invalid users".to_string())),
        }
    }

    /// Settles the followee side of a follow. The follower already has
    /// `followee_id` pushed; on failure one occurrence is pulled back out.
    async fn settle_follow(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
        followee_write: Result<UpdateStatus, AppError>,
    ) -> Result<UpdateStatus, AppError> {
        let err = match followee_write_outcome(followee_write, true) {
            Ok(status) => return Ok(status),
            Err(err) => err,
        };
        warn!(%follower_id, %followee_id, error = %err, "followee write failed, undoing follow");
        let undo = self
            .users
            .update_one(
                doc! { "_id": follower_id, "followees": followee_id },
                remove_one("followees", followee_id),
            )
            .await;
        if let Err(undo_err) = undo {
            error!(%follower_id, %followee_id, error = %undo_err, "could not undo follow");
        }
        Err(err)
    }

    /// Settles the followee side of an unfollow. When the follower side lost
    /// an occurrence of `followee_id` and the followee write failed, it is
    /// pushed back.
    async fn settle_unfollow(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
        removed: bool,
        followee_write: Result<UpdateStatus, AppError>,
    ) -> Result<UpdateStatus, AppError> {
        let err = match followee_write_outcome(followee_write, false) {
            Ok(status) => return Ok(status),
            Err(err) => err,
        };
        if removed {
            warn!(%follower_id, %followee_id, error = %err, "followee write failed, undoing unfollow");
            let undo = self
                .users
                .update_one(
                    doc! { "_id": follower_id },
                    doc! { "$push": { "followees": followee_id } },
                )
                .await;
            if let Err(undo_err) = undo {
                error!(%follower_id, %followee_id, error = %undo_err, "could not undo unfollow");
            }
        }
        Err(err)
    }

    async fn resolve_user_list(
        &self,
        uid: ObjectId,
        list: impl Fn(&User) -> &Vec<ObjectId> + Send,
    ) -> Result<Vec<User>, AppError> {
        let user = self
            .find_user_by_id(uid)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found!".to_string()))?;
        find_by_ids(&self.users, list(&user), |u| u.id).await
    }
}

/// Decides whether the second write of a follow change went through. A
/// follow also needs the followee document to still exist.
pub(crate) fn followee_write_outcome(
    write: Result<UpdateStatus, AppError>,
    require_match: bool,
) -> Result<UpdateStatus, AppError> {
    let status = write?;
    if require_match && status.matched_count == 0 {
        return Err(AppError::NotFound("Invalid users".to_string()));
    }
    Ok(status)
}

/// Update pipeline that drops the first occurrence of `id` from the array
/// `field`, leaving the array untouched when `id` is absent.
pub(crate) fn remove_one(field: &str, id: ObjectId) -> Vec<Document> {
    let array = format!("${}", field);
    let kept = doc! {
        "$let": {
            "vars": { "idx": { "$indexOfArray": [array.as_str(), id] } },
            "in": {
                "$map": {
                    "input": {
                        "$filter": {
                            "input": { "$range": [0, { "$size": array.as_str() }] },
                            "as": "i",
                            "cond": { "$ne": ["$$i", "$$idx"] }
                        }
                    },
                    "as": "i",
                    "in": { "$arrayElemAt": [array.as_str(), "$$i"] }
                }
            }
        }
    };
    let mut set = Document::new();
    set.insert(field, kept);
    vec![doc! { "$set": set }]
}

#[async_trait]
impl UserDao for MongoUserDao {
    async fn find_all_users(&self) -> Result<Vec<User>, AppError> {
        let users = self.users.find(doc! {}).await?.try_collect().await?;
        Ok(users)
    }

    async fn find_user_by_id(&self, uid: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_one(doc! { "_id": uid }).await?)
    }

    async fn find_user_by_username(&self, username: String) -> Result<Option<User>, AppError> {
        Ok(self.users.find_one(doc! { "username": username }).await?)
    }

    async fn create_user(&self, user: User) -> Result<User, AppError> {
        self.users.insert_one(&user).await?;
        debug!(uid = %user.id, username = %user.username, "created user");
        Ok(user)
    }

    async fn update_user(
        &self,
        uid: ObjectId,
        changes: Document,
    ) -> Result<UpdateStatus, AppError> {
        // An empty $set is rejected by the server.
        if changes.is_empty() {
            let matched = self.users.count_documents(doc! { "_id": uid }).await?;
            return Ok(UpdateStatus::new(matched, 0));
        }
        let result = self
            .users
            .update_one(doc! { "_id": uid }, doc! { "$set": changes })
            .await?;
        Ok(result.into())
    }

    async fn delete_user(&self, uid: ObjectId) -> Result<DeleteStatus, AppError> {
        Ok(self.users.delete_one(doc! { "_id": uid }).await?.into())
    }

    async fn delete_user_by_username(&self, username: String) -> Result<DeleteStatus, AppError> {
        Ok(self
            .users
            .delete_one(doc! { "username": username })
            .await?
            .into())
    }

    async fn find_bookmarks_for_user(&self, uid: ObjectId) -> Result<Option<Vec<Tuit>>, AppError> {
        let Some(user) = self.find_user_by_id(uid).await? else {
            return Ok(None);
        };
        let tuits = find_by_ids(&self.tuits, &user.bookmarks, |t| t.id).await?;
        Ok(Some(tuits))
    }

    async fn create_bookmark_for_user(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<User>, AppError> {
        debug!(%uid, %tid, "bookmarking tuit");
        let user = self
            .users
            .find_one_and_update(doc! { "_id": uid }, doc! { "$push": { "bookmarks": tid } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(user)
    }

    async fn delete_bookmark_for_user(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError> {
        let result = self
            .users
            .update_one(doc! { "_id": uid }, doc! { "$pull": { "bookmarks": tid } })
            .await?;
        Ok((result.matched_count > 0).then(|| result.into()))
    }

    async fn delete_all_bookmarks_for_user(
        &self,
        uid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError> {
        let result = self
            .users
            .update_one(doc! { "_id": uid }, doc! { "$set": { "bookmarks": [] } })
            .await?;
        Ok((result.matched_count > 0).then(|| result.into()))
    }

    async fn has_user_bookmarked_tuit(
        &self,
        uid: ObjectId,
        tid: ObjectId,
    ) -> Result<bool, AppError> {
        let count = self
            .users
            .count_documents(doc! { "_id": uid, "bookmarks": tid })
            .await?;
        Ok(count > 0)
    }

    async fn user_follows_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<UpdateStatus, AppError> {
        self.find_pair(follower_id, followee_id).await?;
        debug!(%follower_id, %followee_id, "following user");

        let pushed = self
            .users
            .update_one(
                doc! { "_id": follower_id },
                doc! { "$push": { "followees": followee_id } },
            )
            .await?;
        if pushed.matched_count == 0 {
            return Err(AppError::NotFound("Invalid users".to_string()));
        }

        let followee_write = self
            .users
            .update_one(
                doc! { "_id": followee_id },
                doc! { "$push": { "followers": follower_id } },
            )
            .await
            .map(UpdateStatus::from)
            .map_err(AppError::from);
        self.settle_follow(follower_id, followee_id, followee_write)
            .await
    }

    async fn user_unfollows_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<UpdateStatus, AppError> {
        self.find_pair(follower_id, followee_id).await?;
        debug!(%follower_id, %followee_id, "unfollowing user");

        let pulled = self
            .users
            .update_one(
                doc! { "_id": follower_id, "followees": followee_id },
                remove_one("followees", followee_id),
            )
            .await?;
        let followee_write = self
            .users
            .update_one(
                doc! { "_id": followee_id, "followers": follower_id },
                remove_one("followers", follower_id),
            )
            .await
            .map(UpdateStatus::from)
            .map_err(AppError::from);
        self.settle_unfollow(
            follower_id,
            followee_id,
            pulled.modified_count > 0,
            followee_write,
        )
        .await
    }

    async fn find_all_followers_for_user(&self, uid: ObjectId) -> Result<Vec<User>, AppError> {
        self.resolve_user_list(uid, |user| &user.followers).await
    }

    async fn find_all_followees_for_user(&self, uid: ObjectId) -> Result<Vec<User>, AppError> {
        self.resolve_user_list(uid, |user| &user.followees).await
    }

    async fn does_user_follow_another_user(
        &self,
        follower_id: ObjectId,
        followee_id: ObjectId,
    ) -> Result<bool, AppError> {
        let count = self
            .users
            .count_documents(doc! { "_id": follower_id, "followees": followee_id })
            .await?;
        Ok(count > 0)
    }

    async fn delete_all_followees_for_user(
        &self,
        uid: ObjectId,
    ) -> Result<Option<UpdateStatus>, AppError> {
        let Some(user) = self.find_user_by_id(uid).await? else {
            return Ok(None);
        };

        let mut followees = user.followees;
        followees.sort();
        followees.dedup();
        debug!(%uid, count = followees.len(), "removing user from followers lists");

        let removals = followees.iter().map(|followee_id| {
            self.users
                .update_one(
                    doc! { "_id": *followee_id },
                    doc! { "$pull": { "followers": uid } },
                )
                .into_future()
        });
        try_join_all(removals).await?;

        let result = self
            .users
            .update_one(doc! { "_id": uid }, doc! { "$set": { "followees": [] } })
            .await?;
        Ok(Some(result.into()))
    }
}

#[cfg(test)]
mod tests {
    use mongodb::{bson::Bson, Client};

    use super::*;

    #[test]
    fn test_followee_write_outcome() {
        let status = followee_write_outcome(Ok(UpdateStatus::new(1, 1)), true).unwrap();
        assert_eq!(status.modified_count, 1);

        let gone = followee_write_outcome(Ok(UpdateStatus::new(0, 0)), true);
        assert!(matches!(gone, Err(AppError::NotFound(_))));

        let not_following = followee_write_outcome(Ok(UpdateStatus::new(0, 0)), false).unwrap();
        assert_eq!(not_following.matched_count, 0);

        let failed = followee_write_outcome(Err(AppError::InternalError("down".to_string())), false);
        assert!(matches!(failed, Err(AppError::InternalError(_))));
    }

    #[test]
    fn test_remove_one_pipeline() {
        let id = ObjectId::new();
        let pipeline = remove_one("followers", id);
        assert_eq!(pipeline.len(), 1);

        let kept = pipeline[0]
            .get_document("$set")
            .unwrap()
            .get_document("followers")
            .unwrap();
        let index_of = kept
            .get_document("$let")
            .unwrap()
            .get_document("vars")
            .unwrap()
            .get_document("idx")
            .unwrap()
            .get_array("$indexOfArray")
            .unwrap();
        assert_eq!(index_of, &vec![Bson::String("$followers".to_string()), Bson::ObjectId(id)]);
    }

    async fn live_dao() -> Option<(MongoUserDao, mongodb::Database)> {
        let uri = std::env::var("TUITER_TEST_MONGODB_URI").ok()?;
        let client = Client::with_uri_str(&uri).await.unwrap();
        let db = client.database(&format!("tuiter_unit_{}", ObjectId::new().to_hex()));
        Some((MongoUserDao::new(&Database::new(db.clone())), db))
    }

    async fn user(dao: &MongoUserDao, name: &str) -> User {
        dao.create_user(User::new(name.to_string(), "hash".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_follow_keeps_concurrent_follows() {
        let Some((dao, db)) = live_dao().await else { return };
        let (a, b, c) = (user(&dao, "a").await, user(&dao, "b").await, user(&dao, "c").await);

        // a pushed b, and meanwhile followed c
        dao.users
            .update_one(doc! { "_id": a.id }, doc! { "$push": { "followees": b.id } })
            .await
            .unwrap();
        dao.user_follows_another_user(a.id, c.id).await.unwrap();

        let failed = dao
            .settle_follow(a.id, b.id, Err(AppError::InternalError("down".to_string())))
            .await;
        assert!(failed.is_err());

        let a_now = dao.find_user_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a_now.followees, vec![c.id]);
        let c_now = dao.find_user_by_id(c.id).await.unwrap().unwrap();
        assert_eq!(c_now.followers, vec![a.id]);

        db.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_follow_of_vanished_followee_is_undone() {
        let Some((dao, db)) = live_dao().await else { return };
        let (a, b) = (user(&dao, "a").await, user(&dao, "b").await);

        dao.users
            .update_one(doc! { "_id": a.id }, doc! { "$push": { "followees": b.id } })
            .await
            .unwrap();
        let failed = dao
            .settle_follow(a.id, b.id, Ok(UpdateStatus::new(0, 0)))
            .await;
        assert!(matches!(failed, Err(AppError::NotFound(_))));

        let a_now = dao.find_user_by_id(a.id).await.unwrap().unwrap();
        assert!(a_now.followees.is_empty());

        db.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_unfollow_restores_followee() {
        let Some((dao, db)) = live_dao().await else { return };
        let (a, b) = (user(&dao, "a").await, user(&dao, "b").await);

        let failed = dao
            .settle_unfollow(a.id, b.id, true, Err(AppError::InternalError("down".to_string())))
            .await;
        assert!(failed.is_err());
        let a_now = dao.find_user_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a_now.followees, vec![b.id]);

        let failed = dao
            .settle_unfollow(a.id, b.id, false, Err(AppError::InternalError("down".to_string())))
            .await;
        assert!(failed.is_err());
        let a_now = dao.find_user_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a_now.followees, vec![b.id]);

        db.drop().await.unwrap();
    }

    #[tokio::test]
    async fn test_unfollow_removes_one_occurrence() {
        let Some((dao, db)) = live_dao().await else { return };
        let (a, b, c) = (user(&dao, "a").await, user(&dao, "b").await, user(&dao, "c").await);

        dao.user_follows_another_user(a.id, b.id).await.unwrap();
        dao.user_follows_another_user(a.id, c.id).await.unwrap();
        dao.user_follows_another_user(a.id, b.id).await.unwrap();
        dao.user_unfollows_another_user(a.id, b.id).await.unwrap();

        let a_now = dao.find_user_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(a_now.followees, vec![c.id, b.id]);
        let b_now = dao.find_user_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(b_now.followers, vec![a.id]);

        db.drop().await.unwrap();
    }
}
