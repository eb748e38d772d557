//! Ligand conversion and active-site extraction.
//!
//! The ligand is converted to MOL2 for the docking engine. When a protein
//! is given, the active site around the ligand is cut out with a headless
//! viewer session and written as PDB (surface input) and MOL2 (grid
//! input).

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks};

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct Preparation<'a> {
    ligand: PathBuf,
    protein: Option<PathBuf>,
    output: PathBuf,
    config: &'a RunConfig,
    converted_ligand: PathBuf,
    active_site_pdb: PathBuf,
    active_site_mol2: PathBuf,
}

impl<'a> Preparation<'a> {
    /// Preparation of `ligand` (SDF) and, when `protein` is given, of the
    /// active site of `protein` (PDB) around it.
    pub fn new(
        ligand: &Path,
        protein: Option<&Path>,
        output: &Path,
        config: &'a RunConfig,
    ) -> Self {
        let ligand = paths::absolute(ligand);
        let protein = protein.map(paths::absolute);
        let output = paths::absolute(output);
        let converted_ligand = output.join(format!("{}.mol2", paths::stem(&ligand)));
        let protein_name = protein.as_deref().map(paths::stem).unwrap_or_default();
        let active_site_pdb = output.join(format!("{protein_name}_active_site.pdb"));
        let active_site_mol2 = output.join(format!("{protein_name}_active_site.mol2"));
        Self {
            ligand,
            protein,
            output,
            config,
            converted_ligand,
            active_site_pdb,
            active_site_mol2,
        }
    }

    pub fn converted_ligand(&self) -> &Path {
        &self.converted_ligand
    }

    pub fn active_site_pdb(&self) -> &Path {
        &self.active_site_pdb
    }

    pub fn active_site_mol2(&self) -> &Path {
        &self.active_site_mol2
    }

    fn write_active_site(&self, protein: &Path) -> Result<(), Error> {
        let script = template::render(
            decks::WRITE_ACTIVE_SITE,
            &[
                ("protein", protein.display().to_string()),
                ("ligand", self.ligand.display().to_string()),
                ("radius", self.config.parameters.active_site_radius.to_string()),
                ("active_site_pdb", self.active_site_pdb.display().to_string()),
                ("active_site_mol2", self.active_site_mol2.display().to_string()),
            ],
        )?;
        log::debug!("{}", script);
        let script_path = self.output.join("write_active_site.py");
        super::write_file(&script_path, &script)?;

        let args = ["--nogui".to_string(), script_path.display().to_string()];
        exec::run(&self.config.binaries.chimera, &args, None, None)?;
        outputs_must_exist(&[&self.active_site_pdb, &self.active_site_mol2])?;
        Ok(())
    }

    fn convert_ligand(&self) -> Result<(), Error> {
        let args = [
            "-i".to_string(),
            self.ligand.display().to_string(),
            "-o".to_string(),
            self.converted_ligand.display().to_string(),
        ];
        exec::run(&self.config.binaries.unicon, &args, None, None)?;
        outputs_must_exist(&[&self.converted_ligand])?;
        Ok(())
    }

    fn expected_outputs(&self) -> Vec<&Path> {
        let mut outputs: Vec<&Path> = vec![&self.converted_ligand];
        if self.protein.is_some() {
            outputs.push(&self.active_site_pdb);
            outputs.push(&self.active_site_mol2);
        }
        outputs
    }
}

impl Stage for Preparation<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        let mut inputs: Vec<&Path> = vec![&self.ligand];
        if let Some(protein) = &self.protein {
            inputs.push(protein);
        }
        files_must_exist(&inputs)?;
        ensure_dir(&self.output)?;

        if let Some(protein) = &self.protein {
            self.write_active_site(protein)?;
        }
        self.convert_ligand()?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&self.expected_outputs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_support::stub_config;

    #[test]
    fn declared_outputs_are_construction_time_paths() {
        let config = stub_config();
        let preparation = Preparation::new(
            Path::new("/work/protoss/1cps_h_ligand.sdf"),
            Some(Path::new("/work/protoss/1cps_h.pdb")),
            Path::new("/work/prepare"),
            &config,
        );
        assert_eq!(
            preparation.converted_ligand(),
            Path::new("/work/prepare/1cps_h_ligand.mol2")
        );
        assert_eq!(
            preparation.active_site_pdb(),
            Path::new("/work/prepare/1cps_h_active_site.pdb")
        );
        assert_eq!(
            preparation.active_site_mol2(),
            Path::new("/work/prepare/1cps_h_active_site.mol2")
        );
    }

    #[test]
    fn ligand_only_preparation_ignores_active_site_outputs() {
        let config = stub_config();
        let dir = tempfile::tempdir().unwrap();
        let preparation = Preparation::new(
            Path::new("/in/ligand.sdf"),
            None,
            dir.path(),
            &config,
        );
        // only the converted ligand counts
        std::fs::write(dir.path().join("ligand.mol2"), "").unwrap();
        assert!(preparation.output_exists());
    }
}
