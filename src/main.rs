mod advisor;
mod analysis;
mod app;
mod catalog;
mod cli;
mod engine;
mod execution;
mod interactive;
mod logging;
mod output;
mod paths;
mod prompter;
mod settings;

use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    settings::load_dotenv();
    let log_guard = logging::init(&paths::log_dir(), cli.verbose);
    if let Err(err) = app::run(cli).await {
        tracing::error!("{err:#}");
        eprintln!("error: {err:#}");
        drop(log_guard);
        std::process::exit(2);
    }
}
