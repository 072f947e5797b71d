use actix_web::{body::MessageBody, error::ResponseError, http::StatusCode, test, test::TestRequest, web, App};
use serde_json::Value;
use warung_payment_engine::ReconcileApi;

use crate::{
    endpoint_tests::mocks::{MockReconciliationDb, MockVerifier},
    routes::{order_status, register_order},
    webhook_routes::{doku_webhook, midtrans_webhook},
};

/// POST a payload to the signed-webhook route. The signature middleware is exercised separately (see
/// [`crate::helpers`]); these tests target the handler behind it.
pub async fn post_doku(db: MockReconciliationDb, body: &Value) -> (StatusCode, String) {
    let api = ReconcileApi::new(db);
    let app = App::new().app_data(web::Data::new(api)).service(
        web::resource("/webhook/doku/notification").route(web::post().to(doku_webhook::<MockReconciliationDb>)),
    );
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/webhook/doku/notification").set_json(body).to_request();
    settle(test::try_call_service(&service, req).await)
}

pub async fn post_midtrans(db: MockReconciliationDb, verifier: MockVerifier, body: &Value) -> (StatusCode, String) {
    let api = ReconcileApi::new(db);
    let app = App::new().app_data(web::Data::new(api)).app_data(web::Data::new(verifier)).service(
        web::resource("/webhook/midtrans/notification")
            .route(web::post().to(midtrans_webhook::<MockReconciliationDb, MockVerifier>)),
    );
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/webhook/midtrans/notification").set_json(body).to_request();
    settle(test::try_call_service(&service, req).await)
}

pub async fn post_order(db: MockReconciliationDb, body: &Value) -> (StatusCode, String) {
    let api = ReconcileApi::new(db);
    let app = App::new()
        .app_data(web::Data::new(api))
        .service(web::resource("/orders").route(web::post().to(register_order::<MockReconciliationDb>)));
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/orders").set_json(body).to_request();
    settle(test::try_call_service(&service, req).await)
}

pub async fn get_order_status(db: MockReconciliationDb, reference: &str) -> (StatusCode, String) {
    let api = ReconcileApi::new(db);
    let app = App::new().app_data(web::Data::new(api)).service(
        web::resource("/orders/{reference}/status").route(web::get().to(order_status::<MockReconciliationDb>)),
    );
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri(&format!("/orders/{reference}/status")).to_request();
    settle(test::try_call_service(&service, req).await)
}

// Handler errors surface from `try_call_service` before they are rendered; fold them back into the status and
// message the client would have seen.
fn settle<B: MessageBody>(
    result: Result<actix_web::dev::ServiceResponse<B>, actix_web::Error>,
) -> (StatusCode, String) {
    match result {
        Ok(response) => {
            let (_, res) = response.into_parts();
            let status = res.status();
            let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned());
            (status, body.unwrap_or_default())
        },
        Err(e) => (e.as_response_error().status_code(), e.to_string()),
    }
}
