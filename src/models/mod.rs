pub mod dislike_model;
pub mod like_model;
pub mod message_model;
pub mod tuit_model;
pub mod user_model;
