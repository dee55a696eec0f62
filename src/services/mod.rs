//! Support modules the generated screens import

pub mod api_service;
pub mod models;
