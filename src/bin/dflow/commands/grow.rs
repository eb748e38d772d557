use anyhow::Result;

use dock_flow::config::RunConfig;
use dock_flow::pipeline::{FragmentGeneration, Stage};
use dock_flow::template::Deck;
use dock_flow::workflow::AnchoredGrowing;

use crate::cli::{FragmentsArgs, GrowArgs};

pub fn run_grow(args: GrowArgs, config: &RunConfig) -> Result<()> {
    let workflow = AnchoredGrowing::new(
        &args.protein,
        &args.native_ligand,
        &args.anchor,
        &args.fragment_prefix,
        &args.output,
        config,
        args.workflow.docking_in.map(Deck::File),
        args.receptor.as_deref(),
    );
    workflow.run(args.workflow.recalc)?;
    println!("{}", workflow.built_molecules().display());
    Ok(())
}

pub fn run_fragments(args: FragmentsArgs, config: &RunConfig) -> Result<()> {
    let generation = FragmentGeneration::new(&args.molecules, &args.output, config);
    generation.run(false)?;
    println!("{}", generation.library().prefix.display());
    Ok(())
}
