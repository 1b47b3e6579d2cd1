//! Authenticated REST client for the Print API.
//!
//! Call [`authenticate`] (or [`authenticate_with`] for an explicit
//! [`ClientConfig`]) to exchange OAuth2 client credentials for a bearer token,
//! then use the returned [`Client`] to `get`, `post` and `upload`.

pub mod auth;
pub mod client;
pub mod errors;
pub mod http;

pub use auth::{Credentials, authenticate, authenticate_with};
pub use client::Client;
pub use errors::ApiError;
pub use printapi_core::{ApiVersion, ClientConfig, Environment};
