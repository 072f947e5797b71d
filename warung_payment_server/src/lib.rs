//! # Warung payment server
//! This crate hosts the HTTP surface of the Warung payment gateway. It is responsible for:
//! Listening for incoming payment notifications from the supported providers.
//! Authenticating each notification before anything else looks at it, either by verifying its HMAC signature or by
//! calling back to the provider's status API.
//! Handing the verified status to the reconciliation engine and translating the outcome into the acknowledgment
//! the provider expects.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /orders`: Order intake from the upstream checkout flow.
//! * `GET /orders/{reference}/status`: Stored-status lookup, the manual fallback for missed webhooks.
//! * The two webhook routes. Their paths are configuration (the signature scheme signs over the request target),
//!   not literals; see [`config::DokuConfig`] and [`config::ServerConfig`].

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod webhook_routes;
