// Native Bridge
// Main entry point for the native-bridge binary

use clap::Parser;
use native_bridge::cli::{Cli, Command, ConfigAction};
use native_bridge::config::Config;
use native_bridge::facade::HostApp;
use native_bridge::handlers::{
    handle_config_path, handle_config_show, handle_greet, handle_modules, OutputFormat,
};
use native_bridge::platform::platform_name;
use native_bridge::runtime::native;
use native_bridge::telemetry::init_telemetry_with_level;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_default()?
    };

    // RUST_LOG > --log > config
    let level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(level);

    tracing::info!(
        "Native Bridge v{} ({})",
        env!("CARGO_PKG_VERSION"),
        platform_name()
    );

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Greet => {
            let loader = native::init(&config, &cli.library_dirs);
            let app = HostApp::new(loader);
            handle_greet(&app, format)
        }

        Command::Modules => {
            let loader = native::init(&config, &cli.library_dirs);
            handle_modules(loader, format)
        }

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config, format),
            ConfigAction::Path => handle_config_path(),
        },
    }
}
