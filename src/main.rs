use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{describe_failure, ConfigCommand, RecipeSubcommand, ShellCommand};
use recipesync::api::HttpRecipeApi;
use recipesync::config::Config;
use recipesync::sync::RecipeForm;

#[derive(Parser)]
#[command(name = "recipes")]
#[command(version)]
#[command(about = "Create, list, edit and delete recipes on a remote recipe API", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Recipe(RecipeSubcommand),

    /// Open the interactive recipe form
    Shell(ShellCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipesync=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Recipe(cmd)) => {
            let api = HttpRecipeApi::new(config.api_url.value.clone(), config.timeout())?;
            let mut form = RecipeForm::new(api);
            if let Err(e) = form.load_all().await.map(|_| ()) {
                return Err(describe_failure(&form, &e).into());
            }
            cmd.run(&mut form).await?;
        }
        Some(Commands::Shell(cmd)) => {
            let api = HttpRecipeApi::new(config.api_url.value.clone(), config.timeout())?;
            // A failed fetch shows up in the form's error region
            let mut form = RecipeForm::mount(api).await;
            cmd.run(&mut form).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
