use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Validate, Default, Clone, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Username is required"))]
    #[serde(default)]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    #[serde(default)]
    pub password: String,
}
