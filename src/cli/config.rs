use crate::config::Config;
use anyhow::{Context, Result};

use super::args::{ConfigCliArgs, ConfigCommand};

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            println!("# {}", Config::config_path()?.display());
            print!("{}", rendered);
        }
        ConfigCommand::Model { name } => {
            let mut config = Config::load()?;
            config.set_model(&name)?;
            config.save()?;
            println!("Speech model set to {}", config.engine.model);
        }
    }

    Ok(())
}
