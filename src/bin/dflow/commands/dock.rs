use anyhow::Result;

use dock_flow::config::RunConfig;
use dock_flow::pipeline::{DockingRun, Stage};
use dock_flow::template::Deck;
use dock_flow::workflow::{AnchoredDocking, CrossDocking, SelfDocking};

use crate::cli::{AnchoredDockArgs, CrossDockArgs, DockArgs, SelfDockArgs};

fn custom_deck(docking_in: Option<std::path::PathBuf>) -> Option<Deck> {
    docking_in.map(Deck::File)
}

pub fn run_self_dock(args: SelfDockArgs, config: &RunConfig) -> Result<()> {
    let workflow = SelfDocking::new(
        &args.protein,
        &args.ligand,
        &args.output,
        config,
        custom_deck(args.workflow.docking_in),
    );
    workflow.run(args.workflow.recalc)?;
    println!("{}", workflow.docked().display());
    Ok(())
}

pub fn run_cross_dock(args: CrossDockArgs, config: &RunConfig) -> Result<()> {
    let workflow = CrossDocking::new(
        &args.protein,
        &args.native_ligand,
        &args.docking_ligand,
        &args.output,
        config,
        custom_deck(args.workflow.docking_in),
        args.rmsd_reference.as_deref(),
    );
    workflow.run(args.workflow.recalc)?;
    println!("{}", workflow.docked().display());
    Ok(())
}

pub fn run_anchored_dock(args: AnchoredDockArgs, config: &RunConfig) -> Result<()> {
    let workflow = AnchoredDocking::new(
        &args.protein,
        &args.native_ligand,
        &args.docking_ligand,
        &args.template,
        &args.output,
        config,
        custom_deck(args.workflow.docking_in),
        args.rmsd_reference.as_deref(),
        args.receptor.as_deref(),
    );
    workflow.run(args.workflow.recalc)?;
    println!("{}", workflow.docked().display());
    Ok(())
}

pub fn run_dock(args: DockArgs, config: &RunConfig) -> Result<()> {
    let docking = DockingRun::new(
        &args.ligand,
        &args.spheres,
        &args.grid,
        &args.output,
        config,
        custom_deck(args.docking_in),
        args.rmsd_reference.as_deref(),
    );
    docking.run(false)?;
    println!("{}", docking.docked().display());
    Ok(())
}
