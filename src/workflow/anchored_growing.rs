//! Anchored growing: grow molecules from an anchor fragment inside a
//! prepared receptor using the de novo engine.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::paths;
use crate::pipeline::{
    ensure_dir, run_steps, AnchoredDeNovo, Error, ReceptorPreparation, Stage, Step,
};
use crate::template::Deck;

pub struct AnchoredGrowing<'a> {
    output: PathBuf,
    receptor_preparation: ReceptorPreparation<'a>,
    anchored_de_novo: AnchoredDeNovo<'a>,
}

impl<'a> AnchoredGrowing<'a> {
    /// Growing from `anchor` (MOL2) in the receptor prepared from
    /// `protein` and `native_ligand`, using the fragment library under
    /// `fragment_prefix`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        protein: &Path,
        native_ligand: &Path,
        anchor: &Path,
        fragment_prefix: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
        receptor_dir: Option<&Path>,
    ) -> Self {
        let output = paths::absolute(output);
        let receptor_output = receptor_dir
            .map(paths::absolute)
            .unwrap_or_else(|| output.join("receptor"));
        let receptor_preparation =
            ReceptorPreparation::new(protein, native_ligand, &receptor_output, config);
        let anchored_de_novo = AnchoredDeNovo::new(
            anchor,
            fragment_prefix,
            receptor_preparation.grid_prefix(),
            &output.join("denovo"),
            config,
            deck,
        );
        Self {
            output,
            receptor_preparation,
            anchored_de_novo,
        }
    }

    /// The grown molecules, the primary result artifact.
    pub fn built_molecules(&self) -> &Path {
        self.anchored_de_novo.built_molecules()
    }

    /// Children in dependency order; the growth run always reruns.
    pub fn steps(&self) -> Vec<Step<'_>> {
        vec![
            Step::reusable("receptor preparation", &self.receptor_preparation),
            Step::always("de novo growing", &self.anchored_de_novo),
        ]
    }
}

impl Stage for AnchoredGrowing<'_> {
    fn run(&self, recalculate: bool) -> Result<(), Error> {
        ensure_dir(&self.output)?;
        run_steps(&self.steps(), recalculate)
    }

    fn output_exists(&self) -> bool {
        self.anchored_de_novo.output_exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::stub_config;
    use crate::pipeline::RunPolicy;

    #[test]
    fn growth_runs_in_the_denovo_directory() {
        let config = stub_config();
        let workflow = AnchoredGrowing::new(
            Path::new("/data/1cbx.pdb"),
            Path::new("/data/1cbx_ligand.sdf"),
            Path::new("/data/anchor.mol2"),
            Path::new("/lib/fraglib"),
            Path::new("/work/grow"),
            &config,
            None,
            None,
        );
        assert_eq!(
            workflow.built_molecules(),
            Path::new("/work/grow/denovo/final.denovo_build.mol2")
        );
        let steps = workflow.steps();
        assert_eq!(steps.last().unwrap().policy, RunPolicy::Always);
    }

    #[test]
    fn receptor_dir_override_relocates_the_receptor() {
        let config = stub_config();
        let workflow = AnchoredGrowing::new(
            Path::new("/data/1cbx.pdb"),
            Path::new("/data/1cbx_ligand.sdf"),
            Path::new("/data/anchor.mol2"),
            Path::new("/lib/fraglib"),
            Path::new("/work/grow"),
            &config,
            None,
            Some(Path::new("/shared/receptor")),
        );
        assert_eq!(
            workflow.receptor_preparation.grid_prefix(),
            Path::new("/shared/receptor/grid/grid")
        );
    }
}
