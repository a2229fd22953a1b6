//! Build command implementation.

use std::time::Instant;

use bale_bundler::{BackgroundTask, BuildOutput, ConfigPipeline};
use tracing::debug;

use crate::cli::BuildArgs;
use crate::commands::{config_source, registry, working_dir};
use crate::error::Result;
use crate::ui;

/// Execute the build command and wait for background tasks.
///
/// Plugins such as `serve` leave background tasks running after the build.
/// The command then stays alive until they finish or Ctrl+C is pressed.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let output = run(&args).await?;

    if output.background.is_empty() {
        return Ok(());
    }

    for task in &output.background {
        ui::info(&format!("Running {} (press Ctrl+C to stop)", task.name));
    }
    wait_for_background(output.background).await
}

/// Load, build and report, without waiting for background tasks.
///
/// # Errors
///
/// Configuration errors are reported before any plugin runs; build errors
/// carry the failing plugin and hook.
pub async fn run(args: &BuildArgs) -> Result<BuildOutput> {
    let start = Instant::now();
    let cwd = working_dir(args.cwd.as_deref())?;
    let env = args.environment();
    debug!(cwd = %cwd.display(), mode = %env.mode(), "build requested");

    let pipeline = ConfigPipeline::with_registry(registry(), &cwd);
    let source = config_source(args.config.as_deref(), &cwd)?;
    let config = pipeline.load(&source, &env)?;

    ui::info(&format!(
        "Building {} ({} mode)",
        config.input.display(),
        env.mode()
    ));

    let output = pipeline.run(&config).await?;

    for warning in &output.warnings {
        match &warning.plugin {
            Some(plugin) => ui::warning(&format!("[{plugin}] {}", warning.message)),
            None => ui::warning(&warning.message),
        }
    }

    ui::success(&format!("Built {} target(s)", output.bundles.len()));
    ui::print_build_summary(&output, &cwd, start.elapsed());
    Ok(output)
}

async fn wait_for_background(tasks: Vec<BackgroundTask>) -> Result<()> {
    let handles: Vec<_> = tasks.iter().map(|task| task.handle.abort_handle()).collect();

    let all_done = async {
        for task in tasks {
            // Task failures are logged by the task itself.
            let _ = task.handle.await;
        }
    };

    tokio::select! {
        _ = all_done => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            ui::info("Stopping");
            for handle in handles {
                handle.abort();
            }
        }
    }
    Ok(())
}
