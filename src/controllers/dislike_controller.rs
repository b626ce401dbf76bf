use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Path},
    HttpResponse,
};
use tracing::debug;

use crate::{
    dtos::{
        like::like_dto::DislikeResponseDto, tuit::tuit_response_dto::TuitResponseDto,
        user::user_response_dto::UserResponseDto,
    },
    error::AppError,
    middleware::{parse_id, resolve_user_id},
    services::{dislike_dao::DislikeDao, tuit_dao::TuitDao},
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all_tuits_disliked_by_user)
        .service(find_all_users_that_disliked_tuit)
        .service(user_dislikes_tuit)
        .service(user_undislikes_tuit)
        .service(user_toggles_tuit_dislikes);
}

#[get("/api/users/{uid}/dislikes")]
pub async fn find_all_tuits_disliked_by_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn DislikeDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let tuits = dao.find_all_tuits_disliked_by_user(uid).await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuits(&tuits)))
}

#[get("/api/tuits/{tid}/dislikes")]
pub async fn find_all_users_that_disliked_tuit(
    path: Path<String>,
    dao: Data<dyn DislikeDao>,
) -> Result<HttpResponse, AppError> {
    let users = dao.find_all_users_that_disliked_tuit(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_users(&users)))
}

#[post("/api/users/{uid}/dislikes/{tid}")]
pub async fn user_dislikes_tuit(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn DislikeDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let dislike = dao
        .user_dislikes_tuit(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(DislikeResponseDto::filter_dislike(&dislike)))
}

#[delete("/api/users/{uid}/dislikes/{tid}")]
pub async fn user_undislikes_tuit(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn DislikeDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let status = dao
        .user_undislikes_tuit(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Dislikes the tuit if the user has not, removes the dislike otherwise, then
/// stores the new dislike count on the tuit.
#[put("/api/users/{uid}/dislikes/{tid}")]
pub async fn user_toggles_tuit_dislikes(
    path: Path<(String, String)>,
    session: Session,
    dislikes: Data<dyn DislikeDao>,
    tuits: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let uid = resolve_user_id(&session, &uid)?;
    let tid = parse_id(&tid)?;

    if tuits.find_tuit_by_id(tid).await?.is_none() {
        return Err(AppError::NotFound("Tuit not found!".to_string()));
    }

    if dislikes.find_user_dislikes_tuit(uid, tid).await?.is_some() {
        dislikes.user_undislikes_tuit(uid, tid).await?;
    } else {
        dislikes.user_dislikes_tuit(uid, tid).await?;
    }
    let count = dislikes.count_how_many_disliked_tuit(tid).await?;
    tuits.set_dislike_count(tid, count).await?;
    debug!(%uid, %tid, count, "toggled dislike");

    Ok(HttpResponse::Ok().finish())
}
