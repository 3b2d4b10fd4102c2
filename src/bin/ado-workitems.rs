use anyhow::{Context, Result};
use clap::Parser;

use ado_workitems::{
    Config, WorkItemClient,
    cli::{Args, execute},
    logging::{init_logging, parse_early_log_config},
};

#[tokio::main]
async fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().collect();
    let _log_guard = init_logging(parse_early_log_config(&raw_args));

    let args = Args::parse();

    // Handle --create-config flag
    if args.create_config {
        match Config::create_sample_config()? {
            Some(path) => eprintln!("Sample config created at: {}", path.display()),
            None => eprintln!(
                "Config file already exists at: {}",
                Config::get_config_path()?.display()
            ),
        }
        return Ok(());
    }

    let command = args
        .command
        .context("No command given (use get, create or patch; see --help)")?;

    // Resolve configuration from CLI args, environment variables, and config file
    let client_config =
        Config::load_layered(Config::from_connection_args(&args.connection))?.resolve()?;

    let client = WorkItemClient::new(client_config)?;
    let result = execute(&client, &command).await;
    client.close();

    let work_item = result?;
    println!("{}", serde_json::to_string_pretty(&work_item)?);

    Ok(())
}
