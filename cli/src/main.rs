use clap::Parser;
use shopfront_cli::Cli;

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("shopfront v{} starting", shopfront_address::VERSION);
    std::process::exit(cli.run().await);
}
