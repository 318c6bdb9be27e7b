use clap::Parser;

use rxgen_server::logging::init_logging;
use rxgen_server::{run_server, AppConfig, Cli};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    tracing::info!("Starting rxgen server on port {}", cli.port);

    let config = AppConfig::from_cli(cli);
    run_server(config).await?;

    Ok(())
}
