pub mod db;
pub mod dislike_dao;
pub mod like_dao;
pub mod message_dao;
pub mod tuit_dao;
pub mod user_dao;

use std::sync::Arc;

use actix_web::web::{self, Data};

use self::{
    db::Database,
    dislike_dao::{DislikeDao, MongoDislikeDao},
    like_dao::{LikeDao, MongoLikeDao},
    message_dao::{MessageDao, MongoMessageDao},
    tuit_dao::{MongoTuitDao, TuitDao},
    user_dao::{MongoUserDao, UserDao},
};

/// One instance of every DAO, built at startup and handed to each worker's app.
#[derive(Clone)]
pub struct Daos {
    pub users: Data<dyn UserDao>,
    pub tuits: Data<dyn TuitDao>,
    pub likes: Data<dyn LikeDao>,
    pub dislikes: Data<dyn DislikeDao>,
    pub messages: Data<dyn MessageDao>,
}

impl Daos {
    pub fn mongo(db: &Database) -> Self {
        let users: Arc<dyn UserDao> = Arc::new(MongoUserDao::new(db));
        let tuits: Arc<dyn TuitDao> = Arc::new(MongoTuitDao::new(db));
        let likes: Arc<dyn LikeDao> = Arc::new(MongoLikeDao::new(db));
        let dislikes: Arc<dyn DislikeDao> = Arc::new(MongoDislikeDao::new(db));
        let messages: Arc<dyn MessageDao> = Arc::new(MongoMessageDao::new(db));

        Daos {
            users: Data::from(users),
            tuits: Data::from(tuits),
            likes: Data::from(likes),
            dislikes: Data::from(dislikes),
            messages: Data::from(messages),
        }
    }

    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.users.clone())
            .app_data(self.tuits.clone())
            .app_data(self.likes.clone())
            .app_data(self.dislikes.clone())
            .app_data(self.messages.clone());
    }
}
