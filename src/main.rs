use clap::Parser;
use portprobe::cli::Cli;
use portprobe::output;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = cli.run().await {
        output::print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise the verbosity flags pick the level.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "portprobe=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
