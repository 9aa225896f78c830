use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::future::Future;
use std::io::Write;
use std::time::Instant;
use tokio::process::Command;

use super::SpinnerArgs;
use termspin::Spinner;

/// Exit code a shell reports for a process ended by SIGINT.
const INTERRUPTED: i32 = 130;

#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub spinner: SpinnerArgs,
    /// Command to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Runs the command with a spinner showing, then replays its output.
/// Returns the child's exit code.
pub async fn handle(args: ExecArgs) -> Result<i32> {
    let (program, rest) = args
        .command
        .split_first()
        .context("No command given")?;

    let spinner = args.spinner.spinner()?;
    let started = Instant::now();

    let mut command = Command::new(program);
    command
        .args(rest)
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true);

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let Some(output) = until_interrupted(&spinner, command.output(), ctrl_c).await else {
        eprintln!("{} {} interrupted", "x".red(), args.spinner.label);
        return Ok(INTERRUPTED);
    };

    let output = output.with_context(|| format!("Failed to run '{}'", program))?;
    std::io::stdout().write_all(&output.stdout)?;
    std::io::stderr().write_all(&output.stderr)?;

    let elapsed = started.elapsed().as_secs_f32();
    let code = output.status.code().unwrap_or(1);
    if output.status.success() {
        eprintln!("{} {} ({:.1}s)", "+".green(), args.spinner.label, elapsed);
    } else {
        eprintln!(
            "{} {} failed with exit code {} ({:.1}s)",
            "x".red(),
            args.spinner.label,
            code,
            elapsed
        );
    }
    tracing::debug!(program = %program, code, "command finished");
    Ok(code)
}

/// Awaits `work`, or gives up when `interrupt` fires first. The spinner is
/// stopped either way, so the cursor comes back before the process exits.
async fn until_interrupted<W, I, T>(spinner: &Spinner, work: W, interrupt: I) -> Option<T>
where
    W: Future<Output = T>,
    I: Future,
{
    let result = tokio::select! {
        result = work => Some(result),
        _ = interrupt => {
            tracing::debug!("interrupted, stopping spinner");
            None
        }
    };
    spinner.stop();
    result
}
