//! Core business logic for dishcovery.

pub mod services;

pub use services::*;
