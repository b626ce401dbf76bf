pub mod config;
pub mod controllers;
pub mod dtos;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use actix_web::web;

pub use config::Config;
pub use error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Registers every HTTP route. DAOs are expected as app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(controllers::auth_controller::init)
        .configure(controllers::user_controller::init)
        .configure(controllers::tuit_controller::init)
        .configure(controllers::like_controller::init)
        .configure(controllers::dislike_controller::init)
        .configure(controllers::message_controller::init);
}
