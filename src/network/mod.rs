//! Network layer - HTTP execution against the backend
//!
//! The Network actor receives API commands and sends back outcomes.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::ApiClient;
