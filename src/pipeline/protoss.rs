//! Protonation of a protein (and optionally its ligand) followed by
//! binding-site cleanup.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct ProtossRun<'a> {
    protein: PathBuf,
    ligand: Option<PathBuf>,
    output: PathBuf,
    config: &'a RunConfig,
    protonated_protein: PathBuf,
    protonated_ligand: PathBuf,
}

impl<'a> ProtossRun<'a> {
    /// Protonation of `protein` as PDB, with `ligand` as SDF steering
    /// tautomer assignment in the binding site when given.
    pub fn new(
        protein: &Path,
        ligand: Option<&Path>,
        output: &Path,
        config: &'a RunConfig,
    ) -> Self {
        let protein = paths::absolute(protein);
        let output = paths::absolute(output);
        let name = paths::stem(&protein);
        let protonated_protein = output.join(format!("{name}_h.pdb"));
        let protonated_ligand = output.join(format!("{name}_h_ligand.sdf"));
        Self {
            protein,
            ligand: ligand.map(paths::absolute),
            output,
            config,
            protonated_protein,
            protonated_ligand,
        }
    }

    pub fn protonated_protein(&self) -> &Path {
        &self.protonated_protein
    }

    pub fn protonated_ligand(&self) -> &Path {
        &self.protonated_ligand
    }

    fn protonate(&self) -> Result<(), Error> {
        let mut args = vec![
            "-i".to_string(),
            self.protein.display().to_string(),
            "-o".to_string(),
            self.protonated_protein.display().to_string(),
        ];
        if let Some(ligand) = &self.ligand {
            args.push("--ligand_input".to_string());
            args.push(ligand.display().to_string());
            args.push("--ligand_output".to_string());
            args.push(self.protonated_ligand.display().to_string());
        }
        exec::run(&self.config.binaries.protoss, &args, None, None)?;
        outputs_must_exist(&self.expected_outputs())?;
        Ok(())
    }

    fn clean_binding_site(&self) -> Result<(), Error> {
        let args = [
            "-p".to_string(),
            self.protonated_protein.display().to_string(),
            "-l".to_string(),
            self.protonated_ligand.display().to_string(),
            "-c".to_string(),
            self.protonated_protein.display().to_string(),
        ];
        exec::run(&self.config.binaries.clean_binding_site, &args, None, None)?;
        outputs_must_exist(&[&self.protonated_protein])?;
        Ok(())
    }

    fn expected_outputs(&self) -> Vec<&Path> {
        let mut outputs: Vec<&Path> = vec![&self.protonated_protein];
        if self.ligand.is_some() {
            outputs.push(&self.protonated_ligand);
        }
        outputs
    }
}

impl Stage for ProtossRun<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        let mut inputs: Vec<&Path> = vec![&self.protein];
        if let Some(ligand) = &self.ligand {
            inputs.push(ligand);
        }
        files_must_exist(&inputs)?;
        ensure_dir(&self.output)?;

        self.protonate()?;
        // cleanup needs the protonated ligand to locate the binding site
        if self.ligand.is_some() {
            self.clean_binding_site()?;
        }
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&self.expected_outputs())
    }
}
