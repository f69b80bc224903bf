use clap::Parser;

use starmart_cli::cli::Cli;
use starmart_cli::error::exit_with_error;

fn init_tracing(cli: &Cli) {
    // CLI tracing policy:
    //   --quiet  → always "off" (no logs, no matter what)
    //   --verbose → "info" level, or RUST_LOG when set
    //   default  → "off" (clean terminal; check output goes to stdout)
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        // Default: suppress all logs. RUST_LOG is intentionally ignored so
        // developer env vars don't leak log lines into the user-facing
        // output. Use --verbose to see logs.
        tracing_subscriber::EnvFilter::new("off")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = starmart_cli::run(cli).await {
        exit_with_error(e);
    }
}
