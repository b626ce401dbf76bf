pub mod tuit_dto;
pub mod tuit_response_dto;
