use actix_cors::Cors;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError, models::user_model::User};

const PROFILE_KEY: &str = "profile";

/// Path segment that stands for the logged-in user.
pub const ME: &str = "me";

/// What the session cookie remembers about the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
}

pub fn session_middleware(config: &Config) -> SessionMiddleware<CookieSessionStore> {
    let key = Key::derive_from(config.session_secret.as_bytes());
    let same_site = if config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(config.production)
        .cookie_same_site(same_site)
        .build()
}

pub fn cors(config: &Config) -> Cors {
    let cors = match &config.cors_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

pub fn current_profile(session: &Session) -> Result<Option<Profile>, AppError> {
    Ok(session.get::<Profile>(PROFILE_KEY)?)
}

pub fn remember_profile(session: &Session, user: &User) -> Result<(), AppError> {
    session.renew();
    session.insert(
        PROFILE_KEY,
        Profile {
            id: user.id.to_hex(),
            username: user.username.to_owned(),
        },
    )?;
    Ok(())
}

/// The logged-in user's id, or `Unauthorized` without a session.
pub fn session_user_id(session: &Session) -> Result<ObjectId, AppError> {
    let profile = current_profile(session)?
        .ok_or_else(|| AppError::Unauthorized("No user is logged in".to_string()))?;
    parse_id(&profile.id)
}

pub fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Like `parse_id`, but `me` resolves to the logged-in user.
pub fn resolve_user_id(session: &Session, raw: &str) -> Result<ObjectId, AppError> {
    if raw == ME {
        session_user_id(session)
    } else {
        parse_id(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test::TestRequest, FromRequest};

    async fn session() -> Session {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        Session::from_request(&req, &mut payload).await.unwrap()
    }

    #[test]
    fn test_parse_id() {
        let id = ObjectId::new();
        assert_eq!(parse_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(parse_id("not-an-id"), Err(AppError::InvalidId(_))));
    }

    #[actix_web::test]
    async fn test_me_requires_a_session() {
        let session = session().await;
        assert!(matches!(
            resolve_user_id(&session, ME),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn test_me_resolves_to_profile() {
        let session = session().await;
        let user = User::new("alice".to_string(), "hash".to_string());
        remember_profile(&session, &user).unwrap();

        assert_eq!(resolve_user_id(&session, ME).unwrap(), user.id);
        assert_eq!(
            current_profile(&session).unwrap().unwrap().username,
            "alice"
        );
    }
}
