pub mod api;
pub mod app;
pub mod error;
pub mod i18n;
pub mod session;
pub mod settings;
pub mod upload;
pub mod utils;
