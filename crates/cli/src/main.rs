mod cli;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use transcoder_core::{
    execute_plan, plan_actions,
    runner::{finished_message, started_message},
    Actions, ConverterConfig, FfmpegInvoker, OutputLayout, PathToolProbe, PipelineStep,
    PlanError, StepObserver, ToolProbe,
};

/// Prints step progress to stdout.
struct ConsoleObserver;

#[async_trait]
impl StepObserver for ConsoleObserver {
    async fn step_started(&self, index: usize, total: usize, step: &PipelineStep) {
        println!("{}", started_message(index, total, step));
    }

    async fn step_finished(&self, index: usize, total: usize, step: &PipelineStep, output: &Path) {
        println!("{}: {}", finished_message(index, total, step), output.display());
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if !PathToolProbe::new(&cli.ffmpeg).is_available() {
        bail!(
            "{} is not installed or not in PATH. Please install FFmpeg and try again.",
            cli.ffmpeg.display()
        );
    }

    if !cli.input.is_file() {
        bail!("Input file {} does not exist", cli.input.display());
    }

    let actions = Actions {
        compress: cli.compress,
        extract_audio: cli.to_mp3,
    };
    let layout = OutputLayout::new(&cli.output_dir);

    let plan = match plan_actions(&layout, &cli.input, actions) {
        Ok(plan) => plan,
        Err(e @ PlanError::NothingToDo { .. }) => {
            bail!("{e}. Use --compress or --to-mp3 to process it.")
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(steps = plan.len(), "Planned pipeline");

    let invoker = FfmpegInvoker::new(ConverterConfig::with_ffmpeg_path(&cli.ffmpeg));
    let output = execute_plan(&invoker, &plan, &ConsoleObserver)
        .await
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    println!("Done: {}", output.display());
    Ok(())
}
