use crate::output::{print_json, print_table};
use anyhow::{bail, Context};
use assetenv_core::hosts::{Config, WarnLevel};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a starter config with the built-in hosts
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
    /// Check the config for problems
    Validate,
}

pub fn run(config_path: &Path, subcommand: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcommand {
        ConfigSubcommand::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "config already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
            }
            Config::default()
                .save(config_path)
                .context("failed to write config")?;
            println!("Wrote {}", config_path.display());
        }

        ConfigSubcommand::Show => {
            let cfg = Config::load_or_default(config_path)?;
            if json {
                print_json(&cfg)?;
            } else {
                print!("{}", serde_yaml::to_string(&cfg)?);
            }
        }

        ConfigSubcommand::Validate => {
            let cfg = Config::load_or_default(config_path)?;
            let warnings = cfg.validate();
            if json {
                print_json(&warnings)?;
            } else if warnings.is_empty() {
                println!("Config OK");
            } else {
                let rows = warnings
                    .iter()
                    .map(|w| {
                        vec![
                            match w.level {
                                WarnLevel::Error => "error".to_string(),
                                WarnLevel::Warning => "warning".to_string(),
                            },
                            w.message.clone(),
                        ]
                    })
                    .collect();
                print_table(&["LEVEL", "MESSAGE"], rows);
            }
            let errors = warnings
                .iter()
                .filter(|w| w.level == WarnLevel::Error)
                .count();
            if errors > 0 {
                bail!("config has {errors} error(s)");
            }
        }
    }

    Ok(())
}
