//! Razorpay webhook payloads and their conversion into payment records.

pub mod types;

pub use types::*;
