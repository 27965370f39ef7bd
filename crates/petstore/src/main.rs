//! `petctl` - CLI for petstore
//!
//! This binary provides the command-line interface for managing pet records
//! in a local store.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use petstore::cli::{render_cursor, Cli, Command, ConfigCommand, QueryCommand};
use petstore::{init_logging, Address, Config, PetProvider, ProviderHandle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Insert(cmd) => {
            let handle = open_store(&config)?;
            let address = handle
                .insert(collection(&config), cmd.to_new_pet().to_values())
                .await?;
            println!("{address}");
        }
        Command::Query(cmd) => handle_query(&open_store(&config)?, &config, cmd).await?,
        Command::Update(cmd) => {
            let rows = open_store(&config)?
                .update(cmd.address.clone(), cmd.to_values())
                .await?;
            println!("{rows} row(s) updated");
        }
        Command::Delete { address } => {
            let rows = open_store(&config)?.delete(address).await?;
            println!("{rows} row(s) deleted");
        }
        Command::Type { address } => {
            println!("{}", open_store(&config)?.get_type(address).await?);
        }
        Command::Status(status_cmd) => {
            handle_status(&config, &open_store(&config)?, status_cmd.json).await?;
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<ProviderHandle> {
    let provider = PetProvider::open(config).with_context(|| {
        format!("failed to open store at {}", config.database_path().display())
    })?;
    Ok(ProviderHandle::new(provider))
}

fn collection(config: &Config) -> Address {
    Address::collection(config.provider.authority.clone())
}

async fn handle_query(
    handle: &ProviderHandle,
    config: &Config,
    cmd: QueryCommand,
) -> anyhow::Result<()> {
    let address = cmd.address.unwrap_or_else(|| collection(config));
    let cursor = handle.query(address, cmd.columns).await?;
    print!("{}", render_cursor(&cursor, cmd.format)?);
    Ok(())
}

async fn handle_status(
    config: &Config,
    handle: &ProviderHandle,
    json: bool,
) -> anyhow::Result<()> {
    let stats = handle.stats().await?;
    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "authority": config.provider.authority,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("petctl status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Authority:     {}", config.provider.authority);
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!();
        println!("Pets:          {}", stats.total_pets);
        println!("  male:        {}", stats.male);
        println!("  female:      {}", stats.female);
        println!("  unknown:     {}", stats.unknown);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Busy timeout (ms):  {}", config.storage.busy_timeout_ms);
                println!();
                println!("[Provider]");
                println!("  Authority:          {}", config.provider.authority);
                println!("  Change capacity:    {}", config.provider.change_capacity);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
