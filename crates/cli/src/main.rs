mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pages-deploy")]
#[command(version, about = "Deploy zipped static sites to Pages hosting", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Configure API token and default project
    ///
    /// Create a token in the Pages console under API Token management.
    Configure,

    /// Deploy a ZIP bundle (or a directory, zipped on the fly)
    Publish {
        /// Path to the .zip bundle or site directory
        path: PathBuf,

        /// Target environment: Production or Preview
        #[arg(short, long, default_value = "Production")]
        env: String,

        /// API token (overrides the configured one)
        #[arg(long)]
        token: Option<String>,

        /// Existing project to deploy into (overrides the configured one)
        #[arg(long)]
        project: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match cli.command {
        Command::Configure => commands::deploy::configure().await,
        Command::Publish {
            path,
            env,
            token,
            project,
        } => commands::deploy::publish(path, env, token, project).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "pages-deploy", &mut io::stdout());
            Ok(())
        }
    }
}
