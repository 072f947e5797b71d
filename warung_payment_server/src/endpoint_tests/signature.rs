use actix_web::{
    body::MessageBody,
    error::ResponseError,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
    HttpResponse,
    Responder,
};
use wpg_common::Secret;

use crate::{
    helpers::{body_digest, sign, signature_base},
    middleware::SignatureMiddlewareFactory,
};

const CLIENT_ID: &str = "MCH-0001";
const SECRET: &str = "SK-77aabbcc";
const PATH: &str = "/webhook/doku/notification";

// Echo the body back, so the tests can prove the middleware re-injected the payload it consumed.
async fn echo(body: web::Bytes) -> impl Responder {
    HttpResponse::Ok().body(body)
}

async fn deliver(body: &'static [u8], signed_body: &'static [u8], enabled: bool) -> (StatusCode, Vec<u8>) {
    let factory =
        SignatureMiddlewareFactory::new(CLIENT_ID, Secret::new(SECRET.to_string()), PATH, enabled);
    let app = App::new().service(web::resource(PATH).wrap(factory).route(web::post().to(echo)));
    let service = test::init_service(app).await;
    let base = signature_base(CLIENT_ID, "req-1", "2025-01-15T10:30:00Z", PATH, &body_digest(signed_body));
    let req = TestRequest::post()
        .uri(PATH)
        .insert_header(("Request-Id", "req-1"))
        .insert_header(("Request-Timestamp", "2025-01-15T10:30:00Z"))
        .insert_header(("Signature", sign(SECRET, &base)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body)
        .to_request();
    match test::try_call_service(&service, req).await {
        Ok(response) => {
            let (_, res) = response.into_parts();
            let status = res.status();
            let body = res.into_body().try_into_bytes().map(|b| b.to_vec()).unwrap_or_default();
            (status, body)
        },
        Err(e) => (e.as_response_error().status_code(), Vec::new()),
    }
}

#[actix_web::test]
async fn valid_signatures_pass_and_the_payload_survives() {
    let body = br#"{"order":{"invoice_number":"WRG-1"},"transaction":{"status":"SUCCESS"}}"#;
    let (status, echoed) = deliver(body, body, true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed, body, "the middleware must re-inject the body it consumed");
}

#[actix_web::test]
async fn tampered_bodies_are_rejected_with_401() {
    // Signature computed over the original amount; body delivered with a different one
    let signed = br#"{"order":{"invoice_number":"WRG-1","amount":45000}}"#;
    let tampered = br#"{"order":{"invoice_number":"WRG-1","amount":99000}}"#;
    let (status, _) = deliver(tampered, signed, true).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn missing_signature_headers_are_bad_requests() {
    let factory = SignatureMiddlewareFactory::new(CLIENT_ID, Secret::new(SECRET.to_string()), PATH, true);
    let app = App::new().service(web::resource(PATH).wrap(factory).route(web::post().to(echo)));
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri(PATH).set_payload(&b"{}"[..]).to_request();
    let status = match test::try_call_service(&service, req).await {
        Ok(response) => response.status(),
        Err(e) => e.as_response_error().status_code(),
    };
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn disabled_checks_wave_everything_through() {
    let body = br#"{"anything":"goes"}"#;
    let signed = br#"{"something":"else entirely"}"#;
    let (status, _) = deliver(body, signed, false).await;
    assert_eq!(status, StatusCode::OK);
}
