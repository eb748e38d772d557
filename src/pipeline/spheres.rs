//! Sphere generation over the active-site molecular surface.
//!
//! Works with both the fortran and the cpp sphgen implementations: the
//! fortran variant refuses to run when its OUTSPH log exists and writes
//! its diagnostics there instead of to standard output.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks};

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct SphereGeneration<'a> {
    active_site: PathBuf,
    ligand: PathBuf,
    output: PathBuf,
    config: &'a RunConfig,
    selected_spheres: PathBuf,
    selected_spheres_pdb: PathBuf,
}

impl<'a> SphereGeneration<'a> {
    /// Sphere generation for `active_site` (PDB), selecting spheres around
    /// `ligand` (MOL2).
    pub fn new(active_site: &Path, ligand: &Path, output: &Path, config: &'a RunConfig) -> Self {
        let output = paths::absolute(output);
        let selected_spheres = output.join("selected_spheres.sph");
        let selected_spheres_pdb = output.join("selected_spheres.pdb");
        Self {
            active_site: paths::absolute(active_site),
            ligand: paths::absolute(ligand),
            output,
            config,
            selected_spheres,
            selected_spheres_pdb,
        }
    }

    pub fn selected_spheres(&self) -> &Path {
        &self.selected_spheres
    }

    pub fn selected_spheres_pdb(&self) -> &Path {
        &self.selected_spheres_pdb
    }

    fn generate_surface(&self) -> Result<PathBuf, Error> {
        let surface = self.output.join("rec.ms");
        let args = [
            self.active_site.display().to_string(),
            "-n".to_string(),
            "-w".to_string(),
            self.config.parameters.probe_radius.to_string(),
            "-v".to_string(),
            "-o".to_string(),
            surface.display().to_string(),
        ];
        exec::run(&self.config.binaries.dms, &args, None, None)?;
        outputs_must_exist(&[&surface])?;
        Ok(surface)
    }

    fn generate_spheres(&self, surface: &Path) -> Result<PathBuf, Error> {
        let sphere_clusters = self.output.join("rec.sph");
        // sphgen runs in the output directory with relative paths
        let insph = template::render(
            decks::INSPH,
            &[
                (
                    "surface",
                    paths::relative_to(surface, &self.output).display().to_string(),
                ),
                (
                    "spheres",
                    paths::relative_to(&sphere_clusters, &self.output)
                        .display()
                        .to_string(),
                ),
            ],
        )?;
        super::write_file(&self.output.join("INSPH"), &insph)?;

        // fortran sphgen refuses to run when previous results exist
        let outsph = self.output.join("OUTSPH");
        if outsph.exists() {
            fs::remove_file(&outsph).map_err(|source| Error::Write {
                path: outsph.clone(),
                source,
            })?;
        }
        if sphere_clusters.exists() {
            fs::remove_file(&sphere_clusters).map_err(|source| Error::Write {
                path: sphere_clusters.clone(),
                source,
            })?;
        }

        exec::run::<&str>(&self.config.binaries.sphgen, &[], Some(&self.output), None)?;
        outputs_must_exist(&[&sphere_clusters])?;

        // fortran sphgen logs to OUTSPH instead of standard output
        if outsph.exists() {
            if let Ok(log_text) = fs::read_to_string(&outsph) {
                log::debug!("{}", log_text);
            }
        }
        Ok(sphere_clusters)
    }

    fn select_spheres(&self, sphere_clusters: &Path) -> Result<(), Error> {
        let args = [
            paths::relative_to(sphere_clusters, &self.output)
                .display()
                .to_string(),
            self.ligand.display().to_string(),
            self.config.parameters.sphere_radius.to_string(),
        ];
        exec::run(
            &self.config.binaries.sphere_selector,
            &args,
            Some(&self.output),
            None,
        )?;
        outputs_must_exist(&[&self.selected_spheres])?;
        Ok(())
    }

    fn show_spheres(&self) -> Result<(), Error> {
        let show_spheres = template::render(
            decks::SHOW_SPHERES,
            &[
                (
                    "selected_spheres",
                    paths::relative_to(&self.selected_spheres, &self.output)
                        .display()
                        .to_string(),
                ),
                (
                    "selected_spheres_pdb",
                    paths::relative_to(&self.selected_spheres_pdb, &self.output)
                        .display()
                        .to_string(),
                ),
            ],
        )?;
        log::debug!("{}", show_spheres);
        exec::run::<&str>(
            &self.config.binaries.showsphere,
            &[],
            Some(&self.output),
            Some(show_spheres.as_bytes()),
        )?;
        outputs_must_exist(&[&self.selected_spheres_pdb])?;
        Ok(())
    }
}

impl Stage for SphereGeneration<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        files_must_exist(&[&self.active_site, &self.ligand])?;
        ensure_dir(&self.output)?;

        let surface = self.generate_surface()?;
        let sphere_clusters = self.generate_spheres(&surface)?;
        self.select_spheres(&sphere_clusters)?;
        self.show_spheres()?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&[&self.selected_spheres, &self.selected_spheres_pdb])
    }
}
