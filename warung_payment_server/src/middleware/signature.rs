//! Signature-verification middleware for Actix Web.
//!
//! The signed-webhook provider sends a `Signature` header of the form `HMACSHA256=<base64>`, computed over a
//! canonical string of the client id, the `Request-Id` and `Request-Timestamp` headers, the request target path,
//! and a digest of the raw body (see [`crate::helpers`]). The shared secret is known only to us and the provider,
//! so a matching signature proves both origin and integrity.
//!
//! Wrap the provider's notification route with this middleware; a handler behind it can trust the payload it sees.
//!
//! The body has to be read in full to compute the digest, so the middleware re-injects the consumed payload
//! before calling the wrapped service.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorUnauthorized},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use wpg_common::Secret;

use crate::helpers::{body_digest, signature_base, verify_signature};

pub struct SignatureMiddlewareFactory {
    client_id: String,
    secret: Secret<String>,
    /// The request target the provider signed over. Config, not a literal: it must match the mounted path.
    request_target: String,
    // If false, then the middleware will not check the signature and always allow the call
    enabled: bool,
}

impl SignatureMiddlewareFactory {
    pub fn new(client_id: &str, secret: Secret<String>, request_target: &str, enabled: bool) -> Self {
        SignatureMiddlewareFactory {
            client_id: client_id.into(),
            secret,
            request_target: request_target.into(),
            enabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureMiddlewareService {
            client_id: self.client_id.clone(),
            secret: self.secret.clone(),
            request_target: self.request_target.clone(),
            enabled: self.enabled,
            service: Rc::new(service),
        }))
    }
}

pub struct SignatureMiddlewareService<S> {
    client_id: String,
    secret: Secret<String>,
    request_target: String,
    enabled: bool,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let client_id = self.client_id.clone();
        let secret = self.secret.reveal().clone();
        let request_target = self.request_target.clone();
        let enabled = self.enabled;
        Box::pin(async move {
            trace!("🔐️ Checking notification signature");
            if !enabled {
                trace!("🔐️ Signature checks are disabled. Allowing request.");
                return service.call(req).await;
            }
            let request_id = header_value(&req, "Request-Id")?;
            let request_timestamp = header_value(&req, "Request-Timestamp")?;
            let supplied = header_value(&req, "Signature")?;
            let data = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to extract request data: {:?}", e);
                ErrorBadRequest("Failed to extract request data.")
            })?;
            let digest = body_digest(data.as_ref());
            let base = signature_base(&client_id, &request_id, &request_timestamp, &request_target, &digest);
            if verify_signature(&secret, &base, &supplied) {
                trace!("🔐️ Signature check for request ✅️");
                req.set_payload(bytes_to_payload(data));
                service.call(req).await
            } else {
                warn!("🔐️ Invalid signature on inbound notification. Rejecting.");
                Err(ErrorUnauthorized("Invalid signature."))
            }
        })
    }
}

fn header_value(req: &ServiceRequest, name: &str) -> Result<String, Error> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .ok_or_else(|| {
            warn!("🔐️ Notification is missing the {name} header. Rejecting.");
            ErrorBadRequest(format!("Missing required header: {name}"))
        })
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
