use anyhow::Result;

use dock_flow::config::RunConfig;
use dock_flow::pipeline::{ReceptorPreparation, Stage};

use crate::cli::ReceptorArgs;

pub fn run_receptor(args: ReceptorArgs, config: &RunConfig) -> Result<()> {
    let preparation =
        ReceptorPreparation::new(&args.protein, &args.native_ligand, &args.output, config);
    preparation.run(args.recalc)?;
    println!("{}", preparation.converted_ligand().display());
    println!("{}", preparation.selected_spheres().display());
    println!("{}", preparation.grid_prefix().display());
    Ok(())
}
