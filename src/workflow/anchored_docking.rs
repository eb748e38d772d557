//! Anchored docking: dock a ligand with one atom fixed to the position
//! its counterpart occupies in a template structure.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::paths;
use crate::pipeline::{
    ensure_dir, run_steps, AnchorGenerator, DockingRun, Error, Preparation,
    ReceptorPreparation, RmsdSummary, Stage, Step,
};
use crate::template::{decks, Deck};

pub struct AnchoredDocking<'a> {
    output: PathBuf,
    rmsd_reference: Option<PathBuf>,
    receptor_preparation: ReceptorPreparation<'a>,
    ligand_preparation: Preparation<'a>,
    anchor_generator: AnchorGenerator,
    docking: DockingRun<'a>,
}

impl<'a> AnchoredDocking<'a> {
    /// Anchored docking of `docking_ligand` (SDF) into `protein` (PDB).
    /// `template` (MOL2) carries the linker marking the anchor;
    /// `receptor_dir` reuses a receptor preparation at a caller-chosen
    /// path, creating it there when absent.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        protein: &Path,
        native_ligand: &Path,
        docking_ligand: &Path,
        template: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
        rmsd_reference: Option<&Path>,
        receptor_dir: Option<&Path>,
    ) -> Self {
        let output = paths::absolute(output);
        let deck = deck.unwrap_or(if rmsd_reference.is_some() {
            Deck::BuiltIn(decks::FAD_RMSD_REFERENCE)
        } else {
            Deck::BuiltIn(decks::FAD)
        });

        let receptor_output = receptor_dir
            .map(paths::absolute)
            .unwrap_or_else(|| output.join("receptor"));
        let receptor_preparation =
            ReceptorPreparation::new(protein, native_ligand, &receptor_output, config);
        let ligand_preparation =
            Preparation::new(docking_ligand, None, &output.join("prepare"), config);
        let anchor_generator = AnchorGenerator::new(
            ligand_preparation.converted_ligand(),
            template,
            &output.join("anchored_docking.in"),
            Some(deck),
        );
        let docking = DockingRun::new(
            ligand_preparation.converted_ligand(),
            receptor_preparation.selected_spheres(),
            receptor_preparation.grid_prefix(),
            &output.join("dock"),
            config,
            // the anchored deck is itself a generated artifact
            Some(Deck::File(anchor_generator.output_file().to_path_buf())),
            rmsd_reference,
        );
        Self {
            output,
            rmsd_reference: rmsd_reference.map(paths::absolute),
            receptor_preparation,
            ligand_preparation,
            anchor_generator,
            docking,
        }
    }

    /// The scored poses of the anchored docking run.
    pub fn docked(&self) -> &Path {
        self.docking.docked()
    }

    /// RMSD of the top pose against the reference, when one was given and
    /// the docking has produced poses.
    pub fn rmsd_summary(&self) -> Option<Result<RmsdSummary, Error>> {
        self.rmsd_reference
            .as_ref()
            .map(|_| RmsdSummary::from_poses(self.docking.docked()))
    }

    /// Children in dependency order; the docking run always reruns.
    pub fn steps(&self) -> Vec<Step<'_>> {
        vec![
            Step::reusable("receptor preparation", &self.receptor_preparation),
            Step::reusable("ligand preparation", &self.ligand_preparation),
            Step::reusable("anchoring ligand", &self.anchor_generator),
            Step::always("docking", &self.docking),
        ]
    }
}

impl Stage for AnchoredDocking<'_> {
    fn run(&self, recalculate: bool) -> Result<(), Error> {
        ensure_dir(&self.output)?;
        run_steps(&self.steps(), recalculate)?;

        if self.rmsd_reference.is_some() {
            let summary = RmsdSummary::from_poses(self.docking.docked())?;
            log::debug!("top pose HA_RMSDs: {}", summary.standard);
            log::debug!("top pose HA_RMSDh: {}", summary.graph_matched);
            log::debug!("top pose HA_RMSDm: {}", summary.greedy);
            log::info!("top pose rmsd: {}", summary.top());
        }
        Ok(())
    }

    fn output_exists(&self) -> bool {
        self.docking.output_exists()
    }
}
