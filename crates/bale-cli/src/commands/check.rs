//! Check command implementation.
//!
//! Validates a configuration without building.

use bale_bundler::ConfigPipeline;
use bale_config::validate_fs;

use crate::cli::CheckArgs;
use crate::commands::{config_source, registry, working_dir};
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Discover and parse the configuration
/// 2. Resolve it for the selected mode (required fields, umd names, plugins)
/// 3. Instantiate every active plugin with its options
/// 4. Check that the entry module exists
///
/// # Errors
///
/// Returns the first configuration error found.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let cwd = working_dir(None)?;
    let env = args.environment();
    let source = config_source(args.config.as_deref(), &cwd)?;
    ui::info(&format!("Checking configuration ({} mode)...", env.mode()));

    let resolved = source.read()?.resolve(&env)?;
    validate_fs(&resolved, &cwd)?;

    let pipeline = ConfigPipeline::with_registry(registry(), &cwd);
    let config = pipeline.instantiate(resolved, &env)?;

    ui::success("Configuration is valid!");
    ui::info(&format!("  input: {}", config.input.display()));
    for target in &config.output {
        let map = if target.sourcemap { " + sourcemap" } else { "" };
        ui::info(&format!(
            "  output: {} ({}){map}",
            target.file.display(),
            target.format
        ));
    }
    let plugins = config.plugin_names();
    if plugins.is_empty() {
        ui::info("  plugins: none");
    } else {
        ui::info(&format!("  plugins: {}", plugins.join(", ")));
    }
    Ok(())
}
