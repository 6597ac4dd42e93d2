//! API handlers.

pub mod fulfillment;
pub mod health;
pub mod webhooks;
