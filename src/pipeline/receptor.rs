//! Receptor preparation: the composite stage turning a raw protein and
//! its native ligand into docking-ready spheres and grids.
//!
//! Children are wired at construction time into fixed subdirectories of
//! the output directory; each child consumes declared outputs of an
//! earlier sibling, so declaration order is dependency order.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::paths;

use super::{
    ensure_dir, run_steps, Error, GridGeneration, Preparation, ProtossRun, SphereGeneration,
    Stage, Step,
};

pub struct ReceptorPreparation<'a> {
    output: PathBuf,
    protoss: ProtossRun<'a>,
    preparation: Preparation<'a>,
    spheres: SphereGeneration<'a>,
    grid: GridGeneration<'a>,
}

impl<'a> ReceptorPreparation<'a> {
    /// Receptor preparation for `protein` (PDB) with `native_ligand` (SDF)
    /// defining the active site.
    pub fn new(
        protein: &Path,
        native_ligand: &Path,
        output: &Path,
        config: &'a RunConfig,
    ) -> Self {
        let output = paths::absolute(output);

        let protoss = ProtossRun::new(
            protein,
            Some(native_ligand),
            &output.join("protoss"),
            config,
        );
        let preparation = Preparation::new(
            protoss.protonated_ligand(),
            Some(protoss.protonated_protein()),
            &output.join("prepare"),
            config,
        );
        let spheres = SphereGeneration::new(
            preparation.active_site_pdb(),
            preparation.converted_ligand(),
            &output.join("spheres"),
            config,
        );
        let grid = GridGeneration::new(
            preparation.active_site_mol2(),
            spheres.selected_spheres(),
            &output.join("grid"),
            config,
        );

        Self {
            output,
            protoss,
            preparation,
            spheres,
            grid,
        }
    }

    /// The native ligand converted to MOL2, an alias of the preparation
    /// child's output.
    pub fn converted_ligand(&self) -> &Path {
        self.preparation.converted_ligand()
    }

    /// The selected spheres, an alias of the sphere generation child's
    /// output.
    pub fn selected_spheres(&self) -> &Path {
        self.spheres.selected_spheres()
    }

    /// The grid prefix, an alias of the grid generation child's output.
    pub fn grid_prefix(&self) -> &Path {
        self.grid.grid_prefix()
    }

    /// Children in dependency order.
    pub fn steps(&self) -> Vec<Step<'_>> {
        vec![
            Step::reusable("protonation", &self.protoss),
            Step::reusable("preparation", &self.preparation),
            Step::reusable("sphere generation", &self.spheres),
            Step::reusable("grid generation", &self.grid),
        ]
    }
}

impl Stage for ReceptorPreparation<'_> {
    fn run(&self, recalculate: bool) -> Result<(), Error> {
        ensure_dir(&self.output)?;
        run_steps(&self.steps(), recalculate)
    }

    fn output_exists(&self) -> bool {
        // protoss intermediates are not part of the receptor contract
        self.preparation.output_exists()
            && self.spheres.output_exists()
            && self.grid.output_exists()
    }
}
