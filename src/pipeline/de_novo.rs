//! Anchored de novo growth: the docking engine grows molecules from an
//! anchor fragment using a fragment library inside the receptor grids.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks, Deck};

use super::fragments::FragmentLibrary;
use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct AnchoredDeNovo<'a> {
    anchor: PathBuf,
    library: FragmentLibrary,
    grid_prefix: PathBuf,
    output: PathBuf,
    config: &'a RunConfig,
    deck: Deck,
    built_molecules: PathBuf,
}

impl<'a> AnchoredDeNovo<'a> {
    /// Growth from `anchor` (MOL2) with the fragment library under
    /// `fragment_prefix`, scored against the grids under `grid_prefix`.
    pub fn new(
        anchor: &Path,
        fragment_prefix: &Path,
        grid_prefix: &Path,
        output: &Path,
        config: &'a RunConfig,
        deck: Option<Deck>,
    ) -> Self {
        let output = paths::absolute(output);
        let built_molecules = output.join("final.denovo_build.mol2");
        Self {
            anchor: paths::absolute(anchor),
            library: FragmentLibrary::at_prefix(fragment_prefix),
            grid_prefix: paths::absolute(grid_prefix),
            output,
            config,
            deck: deck.unwrap_or(Deck::BuiltIn(decks::ANCHORED_DE_NOVO)),
            built_molecules,
        }
    }

    /// The grown molecules, the primary result artifact.
    pub fn built_molecules(&self) -> &Path {
        &self.built_molecules
    }
}

impl Stage for AnchoredDeNovo<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        let mut inputs: Vec<&Path> = vec![
            &self.anchor,
            &self.library.torenv,
            &self.library.sidechains,
            &self.library.scaffolds,
            &self.library.rigid,
        ];
        if let Some(deck_file) = self.deck.file() {
            inputs.push(deck_file);
        }
        files_must_exist(&inputs)?;
        ensure_dir(&self.output)?;

        let deck_text = self.deck.load()?;
        let docking_in = template::render(
            &deck_text,
            &[
                ("anchor", self.anchor.display().to_string()),
                ("linkers", self.library.linkers.display().to_string()),
                ("scaffolds", self.library.scaffolds.display().to_string()),
                ("sidechains", self.library.sidechains.display().to_string()),
                ("torenv", self.library.torenv.display().to_string()),
                ("grid", self.grid_prefix.display().to_string()),
                ("vdw", self.config.parameters.vdw.display().to_string()),
                ("flex", self.config.parameters.flex.display().to_string()),
                (
                    "flex_drive",
                    self.config.parameters.flex_drive.display().to_string(),
                ),
            ],
        )?;
        log::debug!("{}", docking_in);
        let docking_in_path = self.output.join("anchored_de_novo.in");
        super::write_file(&docking_in_path, &docking_in)?;

        let args = [
            "-i".to_string(),
            paths::relative_to(&docking_in_path, &self.output)
                .display()
                .to_string(),
        ];
        exec::run(&self.config.binaries.dock, &args, Some(&self.output), None)?;
        outputs_must_exist(&[&self.built_molecules])?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&[&self.built_molecules])
    }
}
