use clap::Parser;
use jobgraph_runner::{execute_discover, execute_synth, execute_validate, Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Synth(command) => execute_synth(command),
        Commands::Discover(command) => execute_discover(command),
        Commands::Validate(command) => execute_validate(command),
    };

    match result {
        Ok(output) => {
            println!("{output}");
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "jobgraph=debug" } else { "jobgraph=info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
