//! Owner-scoped booking management.
//!
//! Every repository operation takes the owner's user id; a booking owned by
//! someone else is indistinguishable from one that does not exist.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::BookingService;
