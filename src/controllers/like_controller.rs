use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Path},
    HttpResponse,
};
use tracing::debug;

use crate::{
    dtos::{
        like::like_dto::LikeResponseDto, tuit::tuit_response_dto::TuitResponseDto,
        user::user_response_dto::UserResponseDto,
    },
    error::AppError,
    middleware::{parse_id, resolve_user_id},
    services::{like_dao::LikeDao, tuit_dao::TuitDao},
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(find_all_tuits_liked_by_user)
        .service(find_all_users_that_liked_tuit)
        .service(user_likes_tuit)
        .service(user_unlikes_tuit)
        .service(user_toggles_tuit_likes);
}

#[get("/api/users/{uid}/likes")]
pub async fn find_all_tuits_liked_by_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn LikeDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let tuits = dao.find_all_tuits_liked_by_user(uid).await?;
    Ok(HttpResponse::Ok().json(TuitResponseDto::filter_tuits(&tuits)))
}

#[get("/api/tuits/{tid}/likes")]
pub async fn find_all_users_that_liked_tuit(
    path: Path<String>,
    dao: Data<dyn LikeDao>,
) -> Result<HttpResponse, AppError> {
    let users = dao.find_all_users_that_liked_tuit(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(UserResponseDto::filter_users(&users)))
}

#[post("/api/users/{uid}/likes/{tid}")]
pub async fn user_likes_tuit(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn LikeDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let like = dao
        .user_likes_tuit(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(LikeResponseDto::filter_like(&like)))
}

#[delete("/api/users/{uid}/likes/{tid}")]
pub async fn user_unlikes_tuit(
    path: Path<(String, String)>,
    session: Session,
    dao: Data<dyn LikeDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let status = dao
        .user_unlikes_tuit(resolve_user_id(&session, &uid)?, parse_id(&tid)?)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

/// Likes the tuit if the user has not, unlikes it otherwise, then stores the
/// new like count on the tuit.
#[put("/api/users/{uid}/likes/{tid}")]
pub async fn user_toggles_tuit_likes(
    path: Path<(String, String)>,
    session: Session,
    likes: Data<dyn LikeDao>,
    tuits: Data<dyn TuitDao>,
) -> Result<HttpResponse, AppError> {
    let (uid, tid) = path.into_inner();
    let uid = resolve_user_id(&session, &uid)?;
    let tid = parse_id(&tid)?;

    if tuits.find_tuit_by_id(tid).await?.is_none() {
        return Err(AppError::NotFound("Tuit not found!".to_string()));
    }

    if likes.find_user_likes_tuit(uid, tid).await?.is_some() {
        likes.user_unlikes_tuit(uid, tid).await?;
    } else {
        likes.user_likes_tuit(uid, tid).await?;
    }
    let count = likes.count_how_many_liked_tuit(tid).await?;
    tuits.set_like_count(tid, count).await?;
    debug!(%uid, %tid, count, "toggled like");

    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        dev::ServiceResponse,
        http::StatusCode,
        test::{self, TestRequest},
        App,
    };
    use mockall::predicate::eq;
    use mongodb::bson::oid::ObjectId;
    use serde_json::Value;

    use super::*;
    use crate::{
        dtos::status_dto::{DeleteStatus, UpdateStatus},
        models::{
            like_model::Like,
            tuit_model::{PopulatedTuit, Stats, Tuit},
            user_model::User,
        },
        services::{like_dao::MockLikeDao, tuit_dao::MockTuitDao},
    };

    async fn call(likes: MockLikeDao, tuits: MockTuitDao, req: TestRequest) -> ServiceResponse {
        let likes: Arc<dyn LikeDao> = Arc::new(likes);
        let tuits: Arc<dyn TuitDao> = Arc::new(tuits);
        let app = test::init_service(
            App::new()
                .app_data(Data::from(likes))
                .app_data(Data::from(tuits))
                .configure(init),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    fn existing_tuit(tuits: &mut MockTuitDao) {
        tuits.expect_find_tuit_by_id().returning(|tid| {
            Ok(Some(PopulatedTuit {
                tuit: Tuit {
                    id: tid,
                    tuit: "hi".to_string(),
                    posted_on: mongodb::bson::DateTime::now(),
                    posted_by: None,
                    youtube: None,
                    avatar_logo: None,
                    image_overlay: None,
                    stats: Stats::default(),
                },
                posted_by: None,
            }))
        });
    }

    #[actix_web::test]
    async fn test_toggle_likes_when_not_liked() {
        let (uid, tid) = (ObjectId::new(), ObjectId::new());
        let mut tuits = MockTuitDao::new();
        existing_tuit(&mut tuits);
        tuits
            .expect_set_like_count()
            .with(eq(tid), eq(1u64))
            .times(1)
            .returning(|_, _| Ok(UpdateStatus::new(1, 1)));

        let mut likes = MockLikeDao::new();
        likes
            .expect_find_user_likes_tuit()
            .with(eq(uid), eq(tid))
            .returning(|_, _| Ok(None));
        likes
            .expect_user_likes_tuit()
            .with(eq(uid), eq(tid))
            .times(1)
            .returning(|uid, tid| {
                Ok(Like {
                    id: ObjectId::new(),
                    tuit: tid,
                    liked_by: uid,
                })
            });
        likes.expect_user_unlikes_tuit().never();
        likes
            .expect_count_how_many_liked_tuit()
            .returning(|_| Ok(1));

        let resp = call(
            likes,
            tuits,
            TestRequest::put().uri(&format!("/api/users/{}/likes/{}", uid, tid)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_toggle_unlikes_when_liked() {
        let (uid, tid) = (ObjectId::new(), ObjectId::new());
        let mut tuits = MockTuitDao::new();
        existing_tuit(&mut tuits);
        tuits
            .expect_set_like_count()
            .with(eq(tid), eq(0u64))
            .times(1)
            .returning(|_, _| Ok(UpdateStatus::new(1, 1)));

        let mut likes = MockLikeDao::new();
        likes.expect_find_user_likes_tuit().returning(|uid, tid| {
            Ok(Some(Like {
                id: ObjectId::new(),
                tuit: tid,
                liked_by: uid,
            }))
        });
        likes.expect_user_likes_tuit().never();
        likes
            .expect_user_unlikes_tuit()
            .with(eq(uid), eq(tid))
            .times(1)
            .returning(|_, _| Ok(DeleteStatus::new(1)));
        likes
            .expect_count_how_many_liked_tuit()
            .returning(|_| Ok(0));

        let resp = call(
            likes,
            tuits,
            TestRequest::put().uri(&format!("/api/users/{}/likes/{}", uid, tid)),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_toggle_on_missing_tuit() {
        let mut tuits = MockTuitDao::new();
        tuits.expect_find_tuit_by_id().returning(|_| Ok(None));
        tuits.expect_set_like_count().never();
        let mut likes = MockLikeDao::new();
        likes.expect_user_likes_tuit().never();

        let resp = call(
            likes,
            tuits,
            TestRequest::put().uri(&format!(
                "/api/users/{}/likes/{}",
                ObjectId::new(),
                ObjectId::new()
            )),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_users_that_liked_tuit() {
        let tid = ObjectId::new();
        let mut likes = MockLikeDao::new();
        likes
            .expect_find_all_users_that_liked_tuit()
            .with(eq(tid))
            .returning(|_| Ok(vec![User::new("alice".to_string(), "hash".to_string())]));

        let resp = call(
            likes,
            MockTuitDao::new(),
            TestRequest::get().uri(&format!("/api/tuits/{}/likes", tid)),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body[0]["username"], "alice");
    }

    #[actix_web::test]
    async fn test_like_returns_record() {
        let (uid, tid) = (ObjectId::new(), ObjectId::new());
        let mut likes = MockLikeDao::new();
        likes.expect_user_likes_tuit().returning(|uid, tid| {
            Ok(Like {
                id: ObjectId::new(),
                tuit: tid,
                liked_by: uid,
            })
        });

        let resp = call(
            likes,
            MockTuitDao::new(),
            TestRequest::post().uri(&format!("/api/users/{}/likes/{}", uid, tid)),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["tuit"], tid.to_hex());
        assert_eq!(body["likedBy"], uid.to_hex());
    }
}
