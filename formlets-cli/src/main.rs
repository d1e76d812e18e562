//! # formlets CLI
//!
//! Render declarative forms and process submissions against them.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "formlets")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the form definition
    #[arg(long, default_value = "form.yml", env = "FORMLETS_FORM")]
    form: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the form as nobody has submitted it yet
    Render,

    /// Process a submission and re-render the form
    Submit {
        /// JSON object file with submitted fields
        #[arg(long)]
        data: Option<PathBuf>,

        /// A submitted field as name=value (repeatable, overrides --data)
        #[arg(long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render => commands::render_form(&cli.form),
        Commands::Submit { data, fields, json } => {
            let submission = commands::read_submission(data.as_deref(), &fields)?;
            commands::submit_form(&cli.form, submission, json)
        }
    }
}
