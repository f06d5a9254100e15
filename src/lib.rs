pub mod catalog;
pub mod collections;
pub mod config;
pub mod notifications;
pub mod profile;
pub mod session;
pub mod support;
