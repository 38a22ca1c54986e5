pub mod auth;
pub mod booking;
pub mod document;
pub mod service;
