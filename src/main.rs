use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::dialog::DialogOptions;
use crate::host::sim::{SimOptions, Simulator};
use crate::i18n::Translator;

mod app;
mod cli;
mod command;
mod config;
mod dialog;
mod host;
mod i18n;
mod theme;
mod tui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting optin-prompt");

    let args = cli::Args::parse();

    let config = Arc::new(config::load(args.config.as_deref())?);
    let theme = theme::theme_from_name(&config.theme.name);

    let sim = Simulator::new(SimOptions {
        trigger_delay: args.delay.map(Duration::from_secs),
        outcome: args.outcome,
        unsupported: args.unsupported,
    });
    let hosts = sim.services();

    let locales = args
        .locale
        .clone()
        .or_else(|| config.dialog.locale.clone())
        .map_or_else(|| hosts.locales.active_locales(), |locale| vec![locale]);
    let translator = Translator::new(&locales);
    let options = DialogOptions::resolve(&config.dialog, &translator, hosts.icons.as_ref());

    let mut app = App::new(config, theme, options, &hosts, sim);
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("optin-prompt").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "optin-prompt.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
