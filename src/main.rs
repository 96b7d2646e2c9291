mod cli;
mod client;
mod error;
mod events;
mod fmt;
mod models;
mod reconciler;
mod settings;
mod splitter;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt as log_fmt, EnvFilter};

use cli::{Cli, Commands};

fn init_tracing() {
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into());
    let fmt_layer = log_fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => cli::run::run(args),
        Commands::Budgets { auth } => cli::budgets::list(&auth),
        Commands::Check {
            import_payee,
            payee,
            memo,
        } => cli::check::run(&import_payee, payee.as_deref(), memo.as_deref()),
        Commands::Init { force } => cli::init::run(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
