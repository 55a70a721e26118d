use analytics_reporter::app;
use analytics_reporter::cli::Cli;
use anyhow::Result;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the report, so logs go to stderr
    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level)
        .init();

    let config = cli.resolve_config()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = app::run(&config, &mut out).await {
        // Reported once here, then exit without handing the error to anyhow.
        tracing::error!("{}", app::failure_message(&e));
        drop(out);
        std::process::exit(1);
    }

    Ok(())
}
