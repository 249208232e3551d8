use anyhow::Result;
use eframe::CreationContext;
use tracing_subscriber::EnvFilter;
use universal_converter::app::{theme, ConverterApp};
use universal_converter::settings::{preferences_path, AppConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    let mut app = ConverterApp::new(config, preferences_path())?;
    app.startup();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([480.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Universal Converter",
        options,
        Box::new(move |cc: &CreationContext| {
            theme::apply(&cc.egui_ctx, app.preferences().theme);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
