#![allow(dead_code)]

pub mod mock_backend;

use std::time::{Duration, Instant};
use universal_converter::app::ConverterApp;
use universal_converter::settings::AppConfig;

pub fn test_config(server_url: &str, download_dir: &std::path::Path) -> AppConfig {
    AppConfig {
        server_url: server_url.to_string(),
        max_concurrent_conversions: 2,
        request_timeout_secs: 10,
        download_dir: Some(download_dir.to_path_buf()),
        ..AppConfig::default()
    }
}

/// Pumps background events until `done` holds or five seconds pass.
pub fn wait_until(app: &mut ConverterApp, mut done: impl FnMut(&ConverterApp) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done(app) {
            return true;
        }
        app.wait_for_event(Duration::from_millis(50));
    }
    done(app)
}
