use crate::data::configuration::Configuration;
use crate::data::dbconnector::{DirectoryConnection, SQLConnector};
use crate::server;
use anyhow::Context;
use clap::Parser;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Overrides the port from the configuration file
    #[arg(short, long)]
    port: Option<u16>,
    #[arg(short, long, default_value_t = String::from("configuration.toml"))]
    configuration_path: String,
    /// Insert the sample directory when the store is empty
    #[arg(short, long, default_value_t = false)]
    seed: bool,
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    debug!("Configuration path: {}", args.configuration_path);
    let mut config = Configuration::load(&args.configuration_path)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.database.seed |= args.seed;
    debug!("Loaded configuration: {config:?}");

    // Check the database connection
    let mut db_connector = SQLConnector::new(&config.database);
    db_connector.connect().await?;
    db_connector
        .check()
        .await
        .context("database did not answer a ping")?;
    // Has database been initialised ?
    if db_connector.is_initialized().await? {
        info!("Database is initialized");
        if config.database.seed {
            db_connector.seed().await?;
        }
    } else {
        info!("Database is not initialized, performing initialization");
        db_connector.initialize(&config).await?;
    }

    server::run(config, db_connector).await
}
