use actix_session::Session;
use actix_web::{
    post,
    web::{self, Data, Json},
    HttpResponse,
};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    dtos::{
        auth::login_user_dto::LoginUserDto,
        user::{user_dto::CreateUserDto, user_response_dto::UserResponseDto},
    },
    error::AppError,
    middleware::{current_profile, parse_id, remember_profile},
    services::user_dao::UserDao,
    utils::password::{compare, hash},
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(signup)
        .service(login)
        .service(profile)
        .service(logout);
}

#[post("/api/auth/signup")]
pub async fn signup(
    body: Json<CreateUserDto>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let body: CreateUserDto = body.into_inner();
    body.validate()?;

    if dao.find_user_by_username(body.username.clone()).await?.is_some() {
        return Err(AppError::Forbidden("Username already taken".to_string()));
    }

    let hash_password: String = hash(&body.password)?;
    let user = dao.create_user(body.into_user(hash_password)).await?;
    remember_profile(&session, &user)?;
    info!(uid = %user.id, "signed up {}", user.username);

    Ok(HttpResponse::Ok().json(UserResponseDto::filter_user(&user)))
}

#[post("/api/auth/login")]
pub async fn login(
    body: Json<LoginUserDto>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let body: LoginUserDto = body.into_inner();
    body.validate()?;

    let user = match dao.find_user_by_username(body.username.clone()).await? {
        Some(user) => user,
        None => return Err(AppError::Forbidden("Invalid credentials".to_string())),
    };

    match compare(&body.password, &user.password) {
        Ok(true) => {}
        Ok(false) => return Err(AppError::Forbidden("Invalid credentials".to_string())),
        Err(e) => {
            warn!(uid = %user.id, "password check failed: {}", e);
            return Err(AppError::Forbidden("Invalid credentials".to_string()));
        }
    }

    remember_profile(&session, &user)?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_user(&user)))
}

#[post("/api/auth/profile")]
pub async fn profile(session: Session, dao: Data<dyn UserDao>) -> Result<HttpResponse, AppError> {
    let logged_in = current_profile(&session)?
        .ok_or_else(|| AppError::Forbidden("Not logged in".to_string()))?;

    match dao.find_user_by_id(parse_id(&logged_in.id)?).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponseDto::filter_user(&user))),
        None => Err(AppError::Forbidden("Not logged in".to_string())),
    }
}

#[post("/api/auth/logout")]
pub async fn logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().finish()
}
