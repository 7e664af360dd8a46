use crate::output::print_json;
use std::path::Path;

pub fn run(config_path: &Path, state_dir: &Path, url: &str, json: bool) -> anyhow::Result<()> {
    let (_, resolution) = super::resolve_for(config_path, state_dir, url)?;

    if json {
        print_json(&serde_json::json!({
            "current": resolution.current.to_string(),
            "origin": resolution.origin,
            "preference": resolution.preference.map(|p| p.to_string()),
            "target": {
                "environment": resolution.target.environment.to_string(),
                "base_url": resolution.target.base_url,
            },
            "overriding": resolution.is_overriding(),
        }))?;
    } else {
        println!("Current:     {}", resolution.current);
        match resolution.preference {
            Some(p) => println!("Preference:  {p}"),
            None => println!("Preference:  (none)"),
        }
        println!("Target:      {}", resolution.target.environment);
        println!("Base URL:    {}", resolution.target.base_url);
        println!(
            "Overriding:  {}",
            if resolution.is_overriding() { "yes" } else { "no" }
        );
    }

    Ok(())
}
