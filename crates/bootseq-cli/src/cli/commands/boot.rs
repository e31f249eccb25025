//! Full-screen boot screen (the default command).

use std::path::Path;

use anyhow::Result;
use bootseq_core::config::Config;

#[cfg(feature = "tui")]
pub async fn run(
    config: &Config,
    script_override: Option<&Path>,
    no_effects: bool,
    exit_on_complete: bool,
) -> Result<()> {
    use bootseq_core::config::EffectsConfig;
    use bootseq_tui::BootOptions;

    // An invalid script fails here, before the terminal is touched.
    let script = config.load_script(script_override)?;

    let mut options = BootOptions::from_config(config);
    if no_effects {
        options.effects = EffectsConfig::disabled();
    }
    options.exit_on_complete = exit_on_complete;

    bootseq_tui::run_boot_screen(script, options).await
}

#[cfg(not(feature = "tui"))]
pub async fn run(
    _config: &Config,
    _script_override: Option<&Path>,
    _no_effects: bool,
    _exit_on_complete: bool,
) -> Result<()> {
    anyhow::bail!("bootseq was built without the boot screen. Use `bootseq print` instead.")
}
