use actix_session::Session;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    HttpResponse,
};
use mongodb::bson::{oid::ObjectId, DateTime};
use validator::Validate;

use crate::{
    dtos::message::message_dto::{MessageResponseDto, SendMessageDto, UpdateMessageDto},
    error::AppError,
    middleware::{parse_id, resolve_user_id},
    models::message_model::Message,
    services::message_dao::MessageDao,
};

// Initialize routes
pub fn init(cfg: &mut web::ServiceConfig) {
    cfg.service(find_messages_sent_by_user)
        .service(find_messages_received_by_user)
        .service(send_message_between_users)
        .service(update_message)
        .service(delete_message)
        .service(delete_all_messages_for_user);
}

#[get("/api/users/{uid}/sentMessages")]
pub async fn find_messages_sent_by_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let messages = dao.find_messages_sent_by_user(uid).await?;
    Ok(HttpResponse::Ok().json(MessageResponseDto::filter_all(&messages)))
}

#[get("/api/users/{uid}/receivedMessages")]
pub async fn find_messages_received_by_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let messages = dao.find_messages_received_by_user(uid).await?;
    Ok(HttpResponse::Ok().json(MessageResponseDto::filter_all(&messages)))
}

#[post("/api/users/{sender_id}/sentMessages/{receiver_id}")]
pub async fn send_message_between_users(
    path: Path<(String, String)>,
    session: Session,
    body: Json<SendMessageDto>,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let (sender_id, receiver_id) = path.into_inner();
    let sender_id = resolve_user_id(&session, &sender_id)?;
    let receiver_id = resolve_user_id(&session, &receiver_id)?;
    let body = body.into_inner();
    body.validate()?;

    let message = Message {
        id: ObjectId::new(),
        message: body.message,
        from: sender_id,
        to: receiver_id,
        sent_on: DateTime::now(),
    };
    let message = dao
        .send_message_between_users(sender_id, receiver_id, message)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponseDto::filter_message(&message)))
}

#[put("/api/messages/{mid}")]
pub async fn update_message(
    path: Path<String>,
    body: Json<UpdateMessageDto>,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let mid = parse_id(&path)?;
    let status = dao.update_message(mid, body.to_set_document()).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/messages/{mid}")]
pub async fn delete_message(
    path: Path<String>,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let status = dao.delete_message(parse_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[delete("/api/users/{uid}/messages")]
pub async fn delete_all_messages_for_user(
    path: Path<String>,
    session: Session,
    dao: Data<dyn MessageDao>,
) -> Result<HttpResponse, AppError> {
    let uid = resolve_user_id(&session, &path)?;
    let status = dao.delete_all_messages_for_user(uid).await?;
    Ok(HttpResponse::Ok().json(status))
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
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        dtos::status_dto::{DeleteStatus, UpdateStatus},
        models::{message_model::PopulatedMessage, user_model::User},
        services::message_dao::MockMessageDao,
    };

    async fn call(dao: MockMessageDao, req: TestRequest) -> ServiceResponse {
        let dao: Arc<dyn MessageDao> = Arc::new(dao);
        let app = test::init_service(App::new().app_data(Data::from(dao)).configure(init)).await;
        test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn test_send_message_takes_ids_from_path() {
        let (sender, receiver) = (ObjectId::new(), ObjectId::new());
        let mut dao = MockMessageDao::new();
        dao.expect_send_message_between_users()
            .withf(move |from, to, message| {
                *from == sender && *to == receiver && message.message == "hey"
            })
            .times(1)
            .returning(|_, _, message| Ok(message));

        let resp = call(
            dao,
            TestRequest::post()
                .uri(&format!("/api/users/{}/sentMessages/{}", sender, receiver))
                .set_json(json!({
                    "message": "hey",
                    "from": ObjectId::new().to_hex(),
                    "to": ObjectId::new().to_hex()
                })),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["from"], sender.to_hex());
        assert_eq!(body["to"], receiver.to_hex());
    }

    #[actix_web::test]
    async fn test_empty_message_is_rejected() {
        let mut dao = MockMessageDao::new();
        dao.expect_send_message_between_users().never();

        let resp = call(
            dao,
            TestRequest::post()
                .uri(&format!(
                    "/api/users/{}/sentMessages/{}",
                    ObjectId::new(),
                    ObjectId::new()
                ))
                .set_json(json!({})),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_sent_messages_are_populated() {
        let uid = ObjectId::new();
        let mut dao = MockMessageDao::new();
        dao.expect_find_messages_sent_by_user()
            .with(eq(uid))
            .returning(|uid| {
                let sender = User::new("alice".to_string(), "hash".to_string());
                Ok(vec![PopulatedMessage {
                    message: Message {
                        id: ObjectId::new(),
                        message: "hey".to_string(),
                        from: uid,
                        to: ObjectId::new(),
                        sent_on: DateTime::now(),
                    },
                    from: Some(sender),
                    to: None,
                }])
            });

        let resp = call(
            dao,
            TestRequest::get().uri(&format!("/api/users/{}/sentMessages", uid)),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body[0]["from"]["username"], "alice");
        assert_eq!(body[0]["to"], Value::Null);
    }

    #[actix_web::test]
    async fn test_update_and_delete_message() {
        let mid = ObjectId::new();
        let mut dao = MockMessageDao::new();
        dao.expect_update_message()
            .withf(move |id, changes| *id == mid && changes.get_str("message").ok() == Some("edit"))
            .returning(|_, _| Ok(UpdateStatus::new(1, 1)));
        dao.expect_delete_message()
            .with(eq(mid))
            .returning(|_| Ok(DeleteStatus::new(1)));
        let dao: Arc<dyn MessageDao> = Arc::new(dao);
        let app = test::init_service(App::new().app_data(Data::from(dao)).configure(init)).await;

        let req = TestRequest::put()
            .uri(&format!("/api/messages/{}", mid))
            .set_json(json!({ "message": "edit" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["modifiedCount"], 1);

        let req = TestRequest::delete()
            .uri(&format!("/api/messages/{}", mid))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["deletedCount"], 1);
    }

    #[actix_web::test]
    async fn test_delete_all_messages_for_user() {
        let uid = ObjectId::new();
        let mut dao = MockMessageDao::new();
        dao.expect_delete_all_messages_for_user()
            .with(eq(uid))
            .returning(|_| Ok(DeleteStatus::new(3)));

        let resp = call(
            dao,
            TestRequest::delete().uri(&format!("/api/users/{}/messages", uid)),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["deletedCount"], 3);
    }
}
