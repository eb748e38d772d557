//! Fragment library generation for de novo growth.
//!
//! The docking engine fragments the input molecules and writes one
//! library per linker count plus a torsion environment table, all under a
//! common prefix.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks};

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct FragmentGeneration<'a> {
    molecules: PathBuf,
    output: PathBuf,
    config: &'a RunConfig,
    library: FragmentLibrary,
}

/// The artifacts of a fragment library under a common prefix.
#[derive(Debug, Clone)]
pub struct FragmentLibrary {
    pub prefix: PathBuf,
    /// Torsion environment table.
    pub torenv: PathBuf,
    /// Fragments with one linker atom.
    pub sidechains: PathBuf,
    /// Fragments with two linker atoms.
    pub linkers: PathBuf,
    /// Fragments with three linker atoms.
    pub scaffolds: PathBuf,
    /// Fragments with no rotatable bonds and no linkers.
    pub rigid: PathBuf,
}

impl FragmentLibrary {
    pub fn at_prefix(prefix: &Path) -> Self {
        let prefix = paths::absolute(prefix);
        Self {
            torenv: paths::with_suffix(&prefix, "_torenv.dat"),
            sidechains: paths::with_suffix(&prefix, "_sidechain.mol2"),
            linkers: paths::with_suffix(&prefix, "_linker.mol2"),
            scaffolds: paths::with_suffix(&prefix, "_scaffold.mol2"),
            rigid: paths::with_suffix(&prefix, "_rigid.mol2"),
            prefix,
        }
    }

    fn all_files(&self) -> [&Path; 5] {
        [
            &self.sidechains,
            &self.linkers,
            &self.scaffolds,
            &self.rigid,
            &self.torenv,
        ]
    }
}

impl<'a> FragmentGeneration<'a> {
    /// Fragment generation over `molecules` (MOL2, multi-molecule).
    pub fn new(molecules: &Path, output: &Path, config: &'a RunConfig) -> Self {
        let output = paths::absolute(output);
        let library = FragmentLibrary::at_prefix(&output.join("fraglib"));
        Self {
            molecules: paths::absolute(molecules),
            output,
            config,
            library,
        }
    }

    pub fn library(&self) -> &FragmentLibrary {
        &self.library
    }
}

impl Stage for FragmentGeneration<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        files_must_exist(&[&self.molecules])?;
        ensure_dir(&self.output)?;

        let fragmentation_in = template::render(
            decks::FRAGMENT_GENERATION,
            &[
                (
                    "molecules",
                    paths::relative_to(&self.molecules, &self.output)
                        .display()
                        .to_string(),
                ),
                ("fraglib_prefix", self.library.prefix.display().to_string()),
                ("vdw", self.config.parameters.vdw.display().to_string()),
                ("flex", self.config.parameters.flex.display().to_string()),
                (
                    "flex_drive",
                    self.config.parameters.flex_drive.display().to_string(),
                ),
            ],
        )?;
        log::debug!("{}", fragmentation_in);
        let fragmentation_in_path = self.output.join("fragment_generation.in");
        super::write_file(&fragmentation_in_path, &fragmentation_in)?;

        let args = [
            "-i".to_string(),
            paths::relative_to(&fragmentation_in_path, &self.output)
                .display()
                .to_string(),
        ];
        exec::run(&self.config.binaries.dock, &args, Some(&self.output), None)?;
        outputs_must_exist(&self.library.all_files())?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&self.library.all_files())
    }
}
