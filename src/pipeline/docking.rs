//! The docking run itself.
//!
//! The deck used is either caller supplied or the adapted FLX protocol
//! from doi: 10.1002/jcc.23905; with an RMSD reference molecule the FLX
//! variant that scores RMSD against the reference is picked instead.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks, Deck};

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct DockingRun<'a> {
    ligand: PathBuf,
    spheres: PathBuf,
    grid_prefix: PathBuf,
    output: PathBuf,
    config: &'a RunConfig,
    deck: Deck,
    rmsd_reference: Option<PathBuf>,
    docked_prefix: PathBuf,
    docked: PathBuf,
}

impl<'a> DockingRun<'a> {
    /// Docking of `ligand` (MOL2) into the receptor described by `spheres`
    /// and the grids under `grid_prefix`.
    pub fn new(
        ligand: &Path,
        spheres: &Path,
        grid_prefix: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
        rmsd_reference: Option<&Path>,
    ) -> Self {
        let deck = deck.unwrap_or(if rmsd_reference.is_some() {
            Deck::BuiltIn(decks::FLX_RMSD_REFERENCE)
        } else {
            Deck::BuiltIn(decks::FLX)
        });
        let output = paths::absolute(output);
        let docked_prefix = output.join("docked");
        let docked = paths::with_suffix(&docked_prefix, "_scored.mol2");
        Self {
            ligand: paths::absolute(ligand),
            spheres: paths::absolute(spheres),
            grid_prefix: paths::absolute(grid_prefix),
            output,
            config,
            deck,
            rmsd_reference: rmsd_reference.map(paths::absolute),
            docked_prefix,
            docked,
        }
    }

    /// The scored poses file, the primary result artifact.
    pub fn docked(&self) -> &Path {
        &self.docked
    }
}

impl Stage for DockingRun<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        // the grid prefix is a prefix, not a file
        let mut inputs: Vec<&Path> = vec![&self.ligand, &self.spheres];
        if let Some(deck_file) = self.deck.file() {
            inputs.push(deck_file);
        }
        files_must_exist(&inputs)?;
        ensure_dir(&self.output)?;

        let deck_text = self.deck.load()?;
        let mut values = vec![
            (
                "ligand",
                paths::relative_to(&self.ligand, &self.output).display().to_string(),
            ),
            (
                "spheres",
                paths::relative_to(&self.spheres, &self.output).display().to_string(),
            ),
            (
                "grid",
                paths::relative_to(&self.grid_prefix, &self.output)
                    .display()
                    .to_string(),
            ),
            ("vdw", self.config.parameters.vdw.display().to_string()),
            ("flex", self.config.parameters.flex.display().to_string()),
            (
                "flex_drive",
                self.config.parameters.flex_drive.display().to_string(),
            ),
            (
                "docked_prefix",
                paths::relative_to(&self.docked_prefix, &self.output)
                    .display()
                    .to_string(),
            ),
        ];
        if let Some(reference) = &self.rmsd_reference {
            // fail before the tool runs when the deck cannot score RMSD
            template::require_placeholder(&deck_text, "reference")?;
            values.push((
                "reference",
                paths::relative_to(reference, &self.output).display().to_string(),
            ));
        }
        let dock_in = template::render(&deck_text, &values)?;

        let dock_in_path = self.output.join("dock.in");
        super::write_file(&dock_in_path, &dock_in)?;

        let args = ["-i".to_string(), dock_in_path.display().to_string()];
        exec::run(&self.config.binaries.dock, &args, Some(&self.output), None)?;
        outputs_must_exist(&[&self.docked])?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&[&self.docked])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::stub_config;

    #[test]
    fn docked_path_is_known_before_running() {
        let config = stub_config();
        let docking = DockingRun::new(
            Path::new("/work/prepare/ligand.mol2"),
            Path::new("/work/spheres/selected_spheres.sph"),
            Path::new("/work/grid/grid"),
            Path::new("/work/dock"),
            &config,
            None,
            None,
        );
        assert_eq!(docking.docked(), Path::new("/work/dock/docked_scored.mol2"));
        assert!(!docking.output_exists());
    }

    #[test]
    fn reference_against_plain_deck_is_a_template_mismatch() {
        let config = stub_config();
        let dir = tempfile::tempdir().unwrap();
        let ligand = dir.path().join("ligand.mol2");
        let spheres = dir.path().join("selected_spheres.sph");
        std::fs::write(&ligand, "").unwrap();
        std::fs::write(&spheres, "").unwrap();

        let docking = DockingRun::new(
            &ligand,
            &spheres,
            &dir.path().join("grid"),
            &dir.path().join("dock"),
            &config,
            // explicitly pick the deck without RMSD support
            Some(Deck::BuiltIn(decks::FLX)),
            Some(&ligand),
        );
        match docking.run(false).unwrap_err() {
            Error::Template(crate::template::Error::UnsupportedFeature { placeholder }) => {
                assert_eq!(placeholder, "reference")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_custom_deck_is_a_precondition_failure() {
        let config = stub_config();
        let dir = tempfile::tempdir().unwrap();
        let ligand = dir.path().join("ligand.mol2");
        let spheres = dir.path().join("selected_spheres.sph");
        std::fs::write(&ligand, "").unwrap();
        std::fs::write(&spheres, "").unwrap();

        let missing_deck = dir.path().join("custom.in.template");
        let docking = DockingRun::new(
            &ligand,
            &spheres,
            &dir.path().join("grid"),
            &dir.path().join("dock"),
            &config,
            Some(Deck::File(missing_deck.clone())),
            None,
        );
        match docking.run(false).unwrap_err() {
            Error::MissingInput(path) => assert_eq!(path, missing_deck),
            other => panic!("unexpected error: {other}"),
        }
    }
}
