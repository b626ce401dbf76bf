use actix_session::Session;
use actix_web::{
    delete, get, head, post, put,
    web::{self, Data, Json, Path},
    HttpResponse,
};
use validator::Validate;

use crate::{
    dtos::{
        tuit::tuit_response_dto::TuitResponseDto,
        user::{
            user_dto::{CreateUserDto, UpdateUserDto},
            user_response_dto::UserResponseDto,
        },
    },
    error::AppError,
    middleware::{parse_id, resolve_user_id},
    services::user_dao::UserDao,
    utils::password,
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all_users)
        .service(create_user)
        .service(delete_user_by_username)
        .service(find_user_by_id)
        .service(update_user)
        .service(delete_user)
        .service(find_bookmarks_for_user)
        .service(create_bookmark_for_user)
        .service(delete_bookmark_for_user)
        .service(delete_all_bookmarks_for_user)
        .service(has_user_bookmarked_tuit)
        .service(user_follows_another_user)
        .service(user_unfollows_another_user)
        .service(does_user_follow_another_user)
        .service(find_all_followers_for_user)
        .service(find_all_followees_for_user)
        .service(delete_all_followees_for_user);
}

fn found_or_not(found: bool) -> HttpResponse {
    if found {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::NotFound().finish()
    }
}

#[get("/api/users")]
pub async fn find_all_users(dao: Data<dyn UserDao>) -> Result<HttpResponse, AppError> {
    let users = dao.find_all_users().await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_users(&users)))
}

#[get("/api/users/{uid}")]
pub async fn find_user_by_id(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let user = dao.find_user_by_id(uid).await?;
    Ok(HttpResponse::Ok().json(user.as_ref().map(UserResponseDto::filter_user)))
}

#[post("/api/users")]
pub async fn create_user(
    body: Json<CreateUserDto>,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;
    let hashed_password = password::hash(&body.password)?;
    let user = dao.create_user(body.into_user(hashed_password)).await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_user(&user)))
}

#[put("/api/users/{uid}")]
pub async fn update_user(
    path: Path<String>,
    body: Json<UpdateUserDto>,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = parse_id(&path)?;
    let mut body = body.into_inner();
    if let Some(plain) = body.password.take() {
        body.password = Some(password::hash(plain)?);
    }
    let status = dao.update_user(uid, body.to_set_document()?).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/users/{uid}")]
pub async fn delete_user(
    path: Path<String>,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let status = dao.delete_user(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[get("/api/users/username/{username}/delete")]
pub async fn delete_user_by_username(
    path: Path<String>,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let status = dao.delete_user_by_username(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[get("/api/users/{uid}/bookmarks")]
pub async fn find_bookmarks_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let tuits = dao.find_bookmarks_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(tuits.as_deref().map(TuitResponseDto::filter_tuits)))
}

#[post("/api/users/{uid}/bookmarks/{tid}")]
pub async fn create_bookmark_for_user(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let user = dao
        .create_bookmark_for_user(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(user.as_ref().map(UserResponseDto::filter_user)))
}

#[delete("/api/users/{uid}/bookmarks/{tid}")]
pub async fn delete_bookmark_for_user(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let status = dao
        .delete_bookmark_for_user(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/users/{uid}/bookmarks")]
pub async fn delete_all_bookmarks_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let status = dao.delete_all_bookmarks_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[head("/api/users/{uid}/bookmarks/{tid}")]
pub async fn has_user_bookmarked_tuit(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let bookmarked = dao
        .has_user_bookmarked_tuit(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(found_or_not(bookmarked))
}

#[post("/api/users/{follower_id}/followees/{followee_id}")]
pub async fn user_follows_another_user(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (follower_id, followee_id) = path.into_inner();
    let status = dao
        .user_follows_another_user(
            resolve_user_id(&session, &follower_id)?,
            parse_id(&followee_id)?,
        )
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/users/{follower_id}/followees/{followee_id}")]
pub async fn user_unfollows_another_user(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (follower_id, followee_id) = path.into_inner();
    let status = dao
        .user_unfollows_another_user(
            resolve_user_id(&session, &follower_id)?,
            parse_id(&followee_id)?,
        )
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

#[head("/api/users/{follower_id}/followees/{followee_id}")]
pub async fn does_user_follow_another_user(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let (follower_id, followee_id) = path.into_inner();
    let follows = dao
        .does_user_follow_another_user(
            resolve_user_id(&session, &follower_id)?,
            parse_id(&followee_id)?,
        )
        .await?;
    Ok(found_or_not(follows))
}

#[get("/api/users/{uid}/followers")]
pub async fn find_all_followers_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let followers = dao.find_all_followers_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_users(&followers)))
}

#[get("/api/users/{uid}/followees")]
pub async fn find_all_followees_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let followees = dao.find_all_followees_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_users(&followees)))
}

#[delete("/api/users/{uid}/followees")]
pub async fn delete_all_followees_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn UserDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let status = dao.delete_all_followees_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(status))
}
