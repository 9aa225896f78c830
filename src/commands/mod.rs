pub mod demo;
pub mod exec;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use termspin::{config, frames, Spinner, SpinnerConfig};

/// Animation options shared by every subcommand that shows a spinner.
#[derive(Args, Debug, Clone)]
pub struct SpinnerArgs {
    /// Text shown next to the animation
    #[arg(short, long, default_value = "Working")]
    pub label: String,
    /// Named frame set (see `termspin presets`)
    #[arg(short, long)]
    pub frames: Option<String>,
    /// Milliseconds each frame stays on screen
    #[arg(short, long)]
    pub interval_ms: Option<u64>,
}

impl SpinnerArgs {
    /// Flags win over the environment, which wins over the defaults.
    pub fn config(&self) -> Result<SpinnerConfig> {
        let mut config = SpinnerConfig::from_env()?;
        if let Some(name) = &self.frames {
            config.frames = config::named_frames(name)?;
        }
        if let Some(ms) = self.interval_ms {
            config.frame_interval_ms = ms;
        }
        Ok(config)
    }

    pub fn spinner(&self) -> Result<Spinner> {
        let config = self.config()?;
        tracing::debug!(
            frames = config.frames.len(),
            interval_ms = config.frame_interval_ms,
            "starting spinner"
        );
        let spinner = Spinner::from_config(self.label.clone(), &config);
        spinner.start();
        Ok(spinner)
    }
}

pub fn list_presets() -> Result<()> {
    println!("{}", "Frame sets".bold());
    println!("{}", "-".repeat(40));
    for (name, set) in frames::PRESETS {
        let marker = if *set == frames::DEFAULT {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("{:<10} {}{}", name.cyan(), set.join(" "), marker);
    }
    println!();
    println!(
        "Default interval: {}ms",
        frames::DEFAULT_INTERVAL.as_millis()
    );
    Ok(())
}
