pub mod like_dto;
