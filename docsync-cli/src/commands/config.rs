//! `docsync config`: inspect or create `~/.docsync/config.yaml`.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use docsync_core::{config, SyncConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as YAML.
    Show,
    /// Print the configuration file path.
    Path,
    /// Write a configuration file with default values.
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    let home = super::home()?;
    let path = config::config_path_at(&home);

    match command {
        ConfigCommand::Show => {
            let config = config::load_at(&home)
                .with_context(|| format!("failed to load {}", path.display()))?;
            let yaml = serde_yaml::to_string(&config).context("failed to render config YAML")?;
            print!("{yaml}");
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init(args) => {
            if path.exists() && !args.force {
                bail!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                );
            }
            let written = config::save_at(&home, &SyncConfig::default())
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {}", written.display());
        }
    }
    Ok(())
}
