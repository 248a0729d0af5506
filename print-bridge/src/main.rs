use clap::Parser;
use print_bridge::cli::Cli;
use print_bridge::{AppState, Config, Server, init_logger, print_banner};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = Config::from_env().merge_cli(cli);

    init_logger(&config);
    print_banner(&config);

    tracing::info!(
        printer = %config.printer_name,
        production = config.is_production(),
        "Print bridge starting"
    );

    let state = AppState::new(config);
    if let Err(e) = Server::new(state).run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
