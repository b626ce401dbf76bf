pub mod auth;
pub mod like;
pub mod message;
pub mod status_dto;
pub mod tuit;
pub mod user;
