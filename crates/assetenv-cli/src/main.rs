mod cmd;
mod output;
mod state;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, pref::PrefSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "assetenv",
    about = "Deployment-environment resolver and asset retargeting for static sites",
    version,
    propagate_version = true
)]
struct Cli {
    /// Hosts config file (default: assetenv.yaml in the current directory)
    #[arg(long, global = true, env = "ASSETENV_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the persisted override preference (default: ~/.assetenv)
    #[arg(long, global = true, env = "ASSETENV_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the asset target for a page URL, applying any dev= override
    Resolve {
        /// Page URL as the browser would see it (host decides the environment)
        #[arg(long)]
        url: String,
    },

    /// Fetch the configured script bundles from the resolved target
    Load {
        #[arg(long)]
        url: String,

        /// Directory to write fetched bundles into
        #[arg(long, default_value = "bundles")]
        out: PathBuf,
    },

    /// Rewrite production asset references in HTML files to the resolved target
    Retarget {
        #[arg(long)]
        url: String,

        /// Write rewritten copies here instead of updating files in place
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// HTML files to rewrite
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Manage the hosts config
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Inspect or clear the persisted override preference
    Pref {
        #[command(subcommand)]
        subcommand: PrefSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let config_path = state::resolve_config_path(cli.config.as_deref());
    let state_dir = state::resolve_state_dir(cli.state_dir.as_deref());

    let result = match cli.command {
        Commands::Resolve { url } => cmd::resolve::run(&config_path, &state_dir, &url, cli.json),
        Commands::Load { url, out } => {
            cmd::load::run(&config_path, &state_dir, &url, &out, cli.json)
        }
        Commands::Retarget {
            url,
            out_dir,
            files,
        } => cmd::retarget::run(
            &config_path,
            &state_dir,
            &url,
            &files,
            out_dir.as_deref(),
            cli.json,
        ),
        Commands::Config { subcommand } => cmd::config::run(&config_path, subcommand, cli.json),
        Commands::Pref { subcommand } => cmd::pref::run(&state_dir, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
