mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{demo, exec};

#[derive(Parser)]
#[command(name = "termspin")]
#[command(about = "Show an in-place spinner while something runs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate for a while with changing labels
    #[command(alias = "d")]
    Demo(demo::DemoArgs),
    /// Run a command behind a spinner
    #[command(alias = "x")]
    Exec(exec::ExecArgs),
    /// List the available frame sets
    #[command(alias = "p")]
    Presets,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => demo::handle(args).await?,
        Commands::Exec(args) => {
            let code = exec::handle(args).await?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Presets => commands::list_presets()?,
    }

    Ok(())
}
