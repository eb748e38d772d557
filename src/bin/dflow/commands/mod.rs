mod dock;
mod grow;
mod receptor;

use anyhow::{Context, Result};

use dock_flow::config::RunConfig;

use crate::cli::{Cli, Command};

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = RunConfig::load(&cli.config)
        .with_context(|| format!("loading run configuration '{}'", cli.config.display()))?;

    match cli.command {
        Command::SelfDock(args) => dock::run_self_dock(args, &config),
        Command::CrossDock(args) => dock::run_cross_dock(args, &config),
        Command::AnchoredDock(args) => dock::run_anchored_dock(args, &config),
        Command::Dock(args) => dock::run_dock(args, &config),
        Command::Grow(args) => grow::run_grow(args, &config),
        Command::Fragments(args) => grow::run_fragments(args, &config),
        Command::Receptor(args) => receptor::run_receptor(args, &config),
    }
}
