mod insights;
mod render;
mod run;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pulse")]
#[command(about = "Derive post engagement metrics and publish the weekly pulse")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the trailing-window report and publish it (default)
    Run(RunArgs),
    /// List published insights for a client
    Insights {
        /// Client slug selecting the NOTION_DB_<SLUG> database
        #[arg(long)]
        client: Option<String>,
    },
}

/// Per-invocation overrides of the environment configuration.
#[derive(Debug, Default, Args)]
struct RunArgs {
    /// Path to the post export CSV
    #[arg(long)]
    input: Option<PathBuf>,
    /// Baseline ER median, in percent
    #[arg(long)]
    baseline_er: Option<f64>,
    /// Baseline IVR median, in percent
    #[arg(long)]
    baseline_ivr: Option<f64>,
    /// Followers count used when the export has no followers column
    #[arg(long)]
    followers: Option<f64>,
    /// Client slug selecting the NOTION_DB_<SLUG> database
    #[arg(long)]
    client: Option<String>,
    /// Print the report without writing to Notion
    #[arg(long)]
    no_publish: bool,
}

impl RunArgs {
    fn apply(&self, config: &mut pulse_core::AppConfig) {
        if let Some(input) = &self.input {
            config.input_path.clone_from(input);
        }
        if let Some(v) = self.baseline_er {
            config.baseline_er = v;
        }
        if let Some(v) = self.baseline_ivr {
            config.baseline_ivr = v;
        }
        if let Some(v) = self.followers {
            config.fallback_followers = v;
        }
        if let Some(slug) = &self.client {
            retarget_client(config, slug);
        }
    }
}

fn retarget_client(config: &mut pulse_core::AppConfig, slug: &str) {
    config.client_slug = slug.to_string();
    config.notion_database_id = pulse_core::client_database_id(slug);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = pulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => {
            args.apply(&mut config);
            tracing::debug!(?config, "configuration loaded");
            run::run_pipeline(&config, !args.no_publish).await?;
        }
        Commands::Insights { client } => {
            if let Some(slug) = client.as_deref() {
                retarget_client(&mut config, slug);
            }
            insights::run_insights(&config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
