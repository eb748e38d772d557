//! Cross-docking: dock a foreign ligand into a receptor whose active
//! site is defined by its native ligand.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::paths;
use crate::pipeline::{
    ensure_dir, run_steps, DockingRun, Error, Preparation, ReceptorPreparation, Stage, Step,
};
use crate::template::Deck;

pub struct CrossDocking<'a> {
    output: PathBuf,
    receptor_preparation: ReceptorPreparation<'a>,
    ligand_preparation: Preparation<'a>,
    docking: DockingRun<'a>,
}

impl<'a> CrossDocking<'a> {
    /// Cross-docking of `docking_ligand` (SDF) into `protein` (PDB),
    /// with `native_ligand` (SDF) defining the active site.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        protein: &Path,
        native_ligand: &Path,
        docking_ligand: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
        rmsd_reference: Option<&Path>,
    ) -> Self {
        let output = paths::absolute(output);
        let receptor_preparation =
            ReceptorPreparation::new(protein, native_ligand, &output.join("receptor"), config);
        let ligand_preparation =
            Preparation::new(docking_ligand, None, &output.join("prepare"), config);
        let docking = DockingRun::new(
            ligand_preparation.converted_ligand(),
            receptor_preparation.selected_spheres(),
            receptor_preparation.grid_prefix(),
            &output.join("dock"),
            config,
            deck,
            rmsd_reference,
        );
        Self {
            output,
            receptor_preparation,
            ligand_preparation,
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
            Step::reusable("ligand preparation", &self.ligand_preparation),
            Step::always("docking", &self.docking),
        ]
    }
}

impl Stage for CrossDocking<'_> {
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
    fn ligand_preparation_is_separate_from_the_receptor() {
        let config = stub_config();
        let workflow = CrossDocking::new(
            Path::new("/data/1cps.pdb"),
            Path::new("/data/1cps_ligand.sdf"),
            Path::new("/data/1cbx_ligand.sdf"),
            Path::new("/work/cross"),
            &config,
            None,
            None,
        );
        assert_eq!(workflow.docked(), Path::new("/work/cross/dock/docked_scored.mol2"));
        let names: Vec<_> = workflow.steps().iter().map(|step| step.name).collect();
        assert_eq!(
            names,
            ["receptor preparation", "ligand preparation", "docking"]
        );
    }

    #[test]
    fn only_docking_always_reruns() {
        let config = stub_config();
        let workflow = CrossDocking::new(
            Path::new("/data/1cps.pdb"),
            Path::new("/data/1cps_ligand.sdf"),
            Path::new("/data/1cbx_ligand.sdf"),
            Path::new("/work/cross"),
            &config,
            None,
            None,
        );
        let policies: Vec<_> = workflow.steps().iter().map(|step| step.policy).collect();
        assert_eq!(
            policies,
            [RunPolicy::Reusable, RunPolicy::Reusable, RunPolicy::Always]
        );
    }
}
