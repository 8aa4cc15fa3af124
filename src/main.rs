//! Doclyst - Medical Reports in Plain Language
//!
//! Desktop client for the Doclyst analysis service.

use clap::Parser;
use iced::application;
use tracing::{info, Level};

use doclyst::config::Config;
use doclyst::gui::DoclystApp;
use doclyst::i18n;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Backend base URL (overrides DOCLYST_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Startup language code (en, bn, zh, hi, es)
    #[arg(short, long)]
    language: Option<String>,
}

fn main() -> iced::Result {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🩺 Doclyst v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(args.backend_url.as_deref(), args.language.as_deref());
    info!("🌐 Backend: {}", config.backend_url);

    i18n::load_overlays();

    application(DoclystApp::title, DoclystApp::update, DoclystApp::view)
        .theme(DoclystApp::theme)
        .subscription(DoclystApp::subscription)
        .run_with(move || DoclystApp::new(config))
}
