use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse,
};
use validator::Validate;

use crate::{
    dtos::tuit::{
        tuit_dto::{CreateTuitDto, UpdateTuitDto},
        tuit_response_dto::TuitResponseDto,
    },
    error::AppError,
    middleware::{parse_id, resolve_user_id, session_user_id},
    services::tuit_dao::TuitDao,
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all_tuits)
        .service(create_tuit)
        .service(find_tuit_by_id)
        .service(update_tuit)
        .service(delete_tuit)
        .service(find_all_tuits_by_user)
        .service(create_tuit_by_user);
}

#[get("/tuits")]
pub async fn find_all_tuits(dao: Data<dyn TuitDao>) -> Result<HttpResponse, AppError> {
    let tuits = dao.find_all_tuits().await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuits(&tuits)))
}

#[get("/tuits/{tid}")]
pub async fn find_tuit_by_id(
    path: Path<String>,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let tuit = dao.find_tuit_by_id(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(tuit.as_ref().map(TuitResponseDto::filter_populated)))
}

#[get("/api/users/{uid}/tuits")]
pub async fn find_all_tuits_by_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let tuits = dao.find_all_tuits_by_user(uid).await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuits(&tuits)))
}

#[post("/api/users/{uid}/tuits")]
pub async fn create_tuit_by_user(
    path: Path<String>,
    session: Session,
    body: Json<CreateTuitDto>,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let body = body.into_inner();
    body.validate()?;
    let tuit = dao.create_tuit_by_user(uid, body.into_tuit()).await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuit(&tuit)))
}

/// Posts as whoever is logged in.
#[post("/tuits")]
pub async fn create_tuit(
    session: Session,
    body: Json<CreateTuitDto>,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let uid = session_user_id(&session)?;
    let body = body.into_inner();
    body.validate()?;
    let tuit = dao.create_tuit_by_user(uid, body.into_tuit()).await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuit(&tuit)))
}

#[put("/tuits/{tid}")]
pub async fn update_tuit(
    path: Path<String>,
    body: Json<UpdateTuitDto>,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let tid = parse_id(&path)?;
    let status = dao.update_tuit(tid, body.to_set_document()?).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/tuits/{tid}")]
pub async fn delete_tuit(
    path: Path<String>,
    dao: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let status = dao.delete_tuit(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(status))
}
