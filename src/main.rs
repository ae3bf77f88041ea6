use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod bridge;
mod config;
mod core;
mod db;
mod docs;
mod error;
mod live;
mod model;
mod routes;
mod utils;

use config::Config;
use db::init_db;

use crate::bridge::FingerprintBridge;
use crate::docs::ApiDoc;
use crate::utils::credential_filter;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Attendance Terminal Service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await;
    let fingerprint_bridge = FingerprintBridge::new(&config);

    let pool_for_filter_warmup = pool.clone();
    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    actix_web::rt::spawn(async move {
        if let Err(e) =
            credential_filter::warmup_credential_filter(&pool_for_filter_warmup, 500).await
        {
            eprintln!("Failed to warmup credential filter: {:?}", e);
        }
    });

    let bridge_for_status = fingerprint_bridge.clone();
    actix_web::rt::spawn(async move {
        if bridge_for_status.check_status().await {
            info!("Fingerprint bridge is reachable");
        } else {
            tracing::warn!("Fingerprint bridge unreachable; kiosks will fall back to PIN");
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(fingerprint_bridge.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
