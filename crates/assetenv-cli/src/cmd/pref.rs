use crate::output::print_json;
use assetenv_core::preference::PreferenceStore;
use chrono::Utc;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum PrefSubcommand {
    /// Show the persisted override preference and its remaining lifetime
    Show,
    /// Drop the persisted override preference
    Clear,
}

pub fn run(state_dir: &Path, subcommand: PrefSubcommand, json: bool) -> anyhow::Result<()> {
    let store = PreferenceStore::new(state_dir);

    match subcommand {
        PrefSubcommand::Show => match store.get_entry()? {
            Some((preference, expires_at)) => {
                let remaining = (expires_at - Utc::now()).num_minutes();
                if json {
                    print_json(&serde_json::json!({
                        "preference": preference.to_string(),
                        "expires_at": expires_at.to_rfc3339(),
                        "remaining_minutes": remaining,
                    }))?;
                } else {
                    println!("Preference:  {preference}");
                    println!("Expires in:  {remaining} min");
                }
            }
            None => {
                if json {
                    print_json(&serde_json::json!({ "preference": null }))?;
                } else {
                    println!("No override preference set.");
                }
            }
        },

        PrefSubcommand::Clear => {
            store.clear()?;
            if json {
                print_json(&serde_json::json!({ "cleared": true }))?;
            } else {
                println!("Cleared.");
            }
        }
    }

    Ok(())
}
