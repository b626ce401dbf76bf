pub mod auth_controller;
pub mod dislike_controller;
pub mod like_controller;
pub mod message_controller;
pub mod tuit_controller;
pub mod user_controller;
