use actix_web::{middleware::Logger, App, HttpServer};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tuiter_server::{
    middleware::{cors, session_middleware},
    routes,
    services::{db::Database, Daos},
    AppError, Config,
};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv().ok(); // Load the .env file
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::init()?;
    let db = Database::init(&config).await?;
    let daos = Daos::mongo(&db);

    info!("Listening on {}:{}", config.host, config.port);
    let bind = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(&config))
            .wrap(cors(&config))
            .wrap(Logger::default())
            .configure(|cfg| daos.register(cfg))
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
