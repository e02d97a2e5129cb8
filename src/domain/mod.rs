//! Remote records and value types handled by the console.

pub mod alert;
pub mod auth;
pub mod blood_request;
pub mod resource;
pub mod types;
pub mod user;
