use clap::Parser;
use tracing::info;

use hsl_filter_demo::app::{select_backend, FilterDemo};
use hsl_filter_demo::config::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=hsl_filter_demo=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hsl_filter_demo=info,warn")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let source = args.load_source()?;
    info!(width = source.width(), height = source.height(), "📐 source image loaded");

    let (backend, note) = select_backend(&args);

    iced::application("HSL Filter", FilterDemo::update, FilterDemo::view)
        .theme(FilterDemo::theme)
        .centered()
        .run_with(move || FilterDemo::new(source, backend, note))?;

    Ok(())
}
