//! `config show` and `config init`.

use peakers_client::ClientConfig;
use std::path::PathBuf;

use crate::error::{CliResult, Notice};
use crate::ConfigAction;

pub fn run(action: &ConfigAction, config_path: Option<PathBuf>) -> CliResult<()> {
    let config = ClientConfig::load(config_path.clone())
        .map_err(|e| Notice::new("Configuration", e.to_string()))?;

    match action {
        ConfigAction::Show => println!("{}", render(&config)?),
        ConfigAction::Init => {
            let path = config_path.or_else(ClientConfig::default_config_path);
            config
                .save(path.clone())
                .map_err(|e| Notice::new("Configuration", e.to_string()))?;
            match path {
                Some(path) => println!("Wrote {}", path.display()),
                None => println!("Config saved"),
            }
        }
    }
    Ok(())
}

pub fn render(config: &ClientConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| Notice::new("Configuration", e.to_string()))
}
