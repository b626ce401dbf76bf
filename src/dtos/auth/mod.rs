pub mod login_user_dto;
