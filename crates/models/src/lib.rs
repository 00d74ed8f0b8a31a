//! sea-orm entities for users, credentials, the service catalog and bookings,
//! with the model-level validation shared by the service layer.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod catalog;
pub mod booking;

#[cfg(test)]
mod tests;
