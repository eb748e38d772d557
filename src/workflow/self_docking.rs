//! Self-docking: dock the receptor's own native ligand back into it.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::paths;
use crate::pipeline::{
    ensure_dir, run_steps, DockingRun, Error, ReceptorPreparation, Stage, Step,
};
use crate::template::Deck;

pub struct SelfDocking<'a> {
    output: PathBuf,
    receptor_preparation: ReceptorPreparation<'a>,
    docking: DockingRun<'a>,
}

impl<'a> SelfDocking<'a> {
    /// Self-docking of `ligand` (SDF) into `protein` (PDB). The ligand
    /// both defines the active site and is docked.
    pub fn new(
        protein: &Path,
        ligand: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
    ) -> Self {
        let output = paths::absolute(output);
        let receptor_preparation =
            ReceptorPreparation::new(protein, ligand, &output.join("receptor"), config);
        let docking = DockingRun::new(
            receptor_preparation.converted_ligand(),
            receptor_preparation.selected_spheres(),
            receptor_preparation.grid_prefix(),
            &output.join("dock"),
            config,
            deck,
            None,
        );
        Self {
            output,
            receptor_preparation,
            docking,
        }
    }

    /// The scored poses of the docking run.
    pub fn docked(&self) -> &Path {
        self.docking.docked()
    }

    /// Children in dependency order; the docking run always reruns.
    pub fn steps(&self) -> Vec<Step<'_>> {
        vec![
            Step::reusable("receptor preparation", &self.receptor_preparation),
            Step::always("docking", &self.docking),
        ]
    }
}

impl Stage for SelfDocking<'_> {
    fn run(&self, recalculate: bool) -> Result<(), Error> {
        ensure_dir(&self.output)?;
        run_steps(&self.steps(), recalculate)
    }

    fn output_exists(&self) -> bool {
        self.docking.output_exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::stub_config;
    use crate::pipeline::RunPolicy;

    #[test]
    fn docked_path_is_inside_the_dock_directory() {
        let config = stub_config();
        let workflow = SelfDocking::new(
            Path::new("/data/1cps.pdb"),
            Path::new("/data/1cps_ligand.sdf"),
            Path::new("/work/self"),
            &config,
            None,
        );
        assert_eq!(workflow.docked(), Path::new("/work/self/dock/docked_scored.mol2"));
    }

    #[test]
    fn docking_is_the_always_run_terminal() {
        let config = stub_config();
        let workflow = SelfDocking::new(
            Path::new("/data/1cps.pdb"),
            Path::new("/data/1cps_ligand.sdf"),
            Path::new("/work/self"),
            &config,
            None,
        );
        let steps = workflow.steps();
        assert_eq!(steps.last().unwrap().name, "docking");
        assert_eq!(steps.last().unwrap().policy, RunPolicy::Always);
        assert_eq!(steps[0].policy, RunPolicy::Reusable);
    }
}
