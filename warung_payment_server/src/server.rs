use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use midtrans_tools::MidtransApi;
use warung_payment_engine::{traits::ReconciliationDatabase, ReconcileApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::SignatureMiddlewareFactory,
    routes::{health, order_status, register_order},
    webhook_routes::{doku_webhook, midtrans_webhook},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Order database ready at {}", db.url());
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let verifier = MidtransApi::new(config.midtrans.clone())
        .map_err(|e| ServerError::InitializeError(format!("Could not create the status-query client. {e}")))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let api = ReconcileApi::new(db.clone());
        let doku = config.doku.clone();
        let signature_guard = SignatureMiddlewareFactory::new(
            &doku.client_id,
            doku.secret_key.clone(),
            &doku.notification_path,
            doku.signature_checks,
        );
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wpg::access_log"))
            .app_data(web::Data::new(api))
            .app_data(web::Data::new(verifier.clone()))
            .service(health)
            .service(
                web::resource(doku.notification_path.as_str())
                    .wrap(signature_guard)
                    .route(web::post().to(doku_webhook::<SqliteDatabase>)),
            )
            .service(
                web::resource(config.midtrans_notification_path.as_str())
                    .route(web::post().to(midtrans_webhook::<SqliteDatabase, MidtransApi>)),
            )
            .service(web::resource("/orders").route(web::post().to(register_order::<SqliteDatabase>)))
            .service(
                web::resource("/orders/{reference}/status")
                    .route(web::get().to(order_status::<SqliteDatabase>)),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
