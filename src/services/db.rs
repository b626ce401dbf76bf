use std::collections::HashMap;

use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    config::Config,
    error::AppError,
    models::{
        dislike_model::Dislike, like_model::Like, message_model::Message, tuit_model::Tuit,
        user_model::User,
    },
};

pub struct Database {
    db: mongodb::Database,
}

impl Database {
    pub async fn init(config: &Config) -> Result<Self, AppError> {
        let client: Client = Client::with_uri_str(&config.database_url).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(&config.database_name));
        info!("Using MongoDB database {}", db.name());
        Ok(Database::new(db))
    }

    pub fn new(db: mongodb::Database) -> Self {
        Database { db }
    }

    pub fn inner(&self) -> &mongodb::Database {
        &self.db
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn tuits(&self) -> Collection<Tuit> {
        self.db.collection("tuits")
    }

    pub fn messages(&self) -> Collection<Message> {
        self.db.collection("messages")
    }

    pub fn likes(&self) -> Collection<Like> {
        self.db.collection("likes")
    }

    pub fn dislikes(&self) -> Collection<Dislike> {
        self.db.collection("dislikes")
    }
}

/// Loads every document whose `_id` is in `ids`, keyed by id.
pub(crate) async fn find_map_by_ids<T>(
    collection: &Collection<T>,
    ids: &[ObjectId],
    id_of: impl Fn(&T) -> ObjectId,
) -> Result<HashMap<ObjectId, T>, AppError>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let found: Vec<T> = collection
        .find(doc! { "_id": { "$in": ids.to_vec() } })
        .await?
        .try_collect()
        .await?;
    Ok(found.into_iter().map(|item| (id_of(&item), item)).collect())
}

/// Resolves a list of references to documents. Order and repeats follow `ids`;
/// ids with no matching document are skipped.
pub(crate) async fn find_by_ids<T>(
    collection: &Collection<T>,
    ids: &[ObjectId],
    id_of: impl Fn(&T) -> ObjectId,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned + Clone + Send + Sync + Unpin,
{
    let found = find_map_by_ids(collection, ids, id_of).await?;
    Ok(in_reference_order(&found, ids))
}

pub(crate) fn in_reference_order<T: Clone>(found: &HashMap<ObjectId, T>, ids: &[ObjectId]) -> Vec<T> {
    ids.iter().filter_map(|id| found.get(id).cloned()).collect()
}
