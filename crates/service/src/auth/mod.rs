//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and bearer token verification live here, independent
//! of the HTTP layer.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
