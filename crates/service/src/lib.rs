//! Service layer providing business operations on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Independent of the web framework; the `server` crate maps errors to HTTP.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod booking;
#[cfg(test)]
pub mod test_support;
