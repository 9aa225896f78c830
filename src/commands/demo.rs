use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::time::{Duration, Instant};

use super::SpinnerArgs;

#[derive(Args, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub spinner: SpinnerArgs,
    /// How long to animate for, in milliseconds
    #[arg(short, long, default_value_t = 3000)]
    pub duration_ms: u64,
    /// Number of label updates spread over the run
    #[arg(short, long, default_value_t = 3)]
    pub steps: u32,
}

pub async fn handle(args: DemoArgs) -> Result<()> {
    let spinner = args.spinner.spinner()?;
    let steps = args.steps.max(1);
    let step = Duration::from_millis(args.duration_ms) / steps;
    let started = Instant::now();

    for n in 1..=steps {
        tokio::time::sleep(step).await;
        if n < steps {
            spinner.set_label(format!(
                "{} ({}/{}, {:.1}s)",
                args.spinner.label,
                n,
                steps,
                started.elapsed().as_secs_f32()
            ));
        }
    }

    spinner.stop();
    println!(
        "{} {} in {:.1}s",
        "+".green(),
        args.spinner.label,
        started.elapsed().as_secs_f32()
    );
    Ok(())
}
