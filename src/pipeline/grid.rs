//! Potential grid generation: a box around the selected spheres, then the
//! energy and bump grids over the active site.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::exec;
use crate::paths;
use crate::template::{self, decks};

use super::{ensure_dir, files_must_exist, outputs_must_exist, Error, Stage};

pub struct GridGeneration<'a> {
    active_site: PathBuf,
    spheres: PathBuf,
    output: PathBuf,
    config: &'a RunConfig,
    grid_prefix: PathBuf,
    energy_grid: PathBuf,
    bump_grid: PathBuf,
}

impl<'a> GridGeneration<'a> {
    /// Grid generation over `active_site` (MOL2) boxed around the selected
    /// `spheres`.
    pub fn new(active_site: &Path, spheres: &Path, output: &Path, config: &'a RunConfig) -> Self {
        let output = paths::absolute(output);
        let grid_prefix = output.join("grid");
        let energy_grid = paths::with_suffix(&grid_prefix, ".nrg");
        let bump_grid = paths::with_suffix(&grid_prefix, ".bmp");
        Self {
            active_site: paths::absolute(active_site),
            spheres: paths::absolute(spheres),
            output,
            config,
            grid_prefix,
            energy_grid,
            bump_grid,
        }
    }

    /// Prefix shared by the grid files; downstream decks reference the
    /// grids through it.
    pub fn grid_prefix(&self) -> &Path {
        &self.grid_prefix
    }

    pub fn energy_grid(&self) -> &Path {
        &self.energy_grid
    }

    pub fn bump_grid(&self) -> &Path {
        &self.bump_grid
    }

    fn create_box(&self) -> Result<PathBuf, Error> {
        let box_file = self.output.join("box.pdb");
        let box_in = template::render(
            decks::BOX,
            &[
                (
                    "spheres",
                    paths::relative_to(&self.spheres, &self.output).display().to_string(),
                ),
                (
                    "box",
                    paths::relative_to(&box_file, &self.output).display().to_string(),
                ),
            ],
        )?;
        log::debug!("{}", box_in);
        exec::run::<&str>(
            &self.config.binaries.showbox,
            &[],
            Some(&self.output),
            Some(box_in.as_bytes()),
        )?;
        outputs_must_exist(&[&box_file])?;
        Ok(box_file)
    }

    fn create_grid(&self, box_file: &Path) -> Result<(), Error> {
        // the grid program truncates deck paths beyond 80 characters;
        // fall back to the absolute path when the relative one is longer
        let mut active_site_path = paths::relative_to(&self.active_site, &self.output)
            .display()
            .to_string();
        if active_site_path.len() > 80 {
            active_site_path = self.active_site.display().to_string();
        }

        let grid_in = template::render(
            decks::GRID,
            &[
                ("active_site", active_site_path),
                (
                    "box",
                    paths::relative_to(box_file, &self.output).display().to_string(),
                ),
                ("vdw", self.config.parameters.vdw.display().to_string()),
                (
                    "grid",
                    paths::relative_to(&self.grid_prefix, &self.output)
                        .display()
                        .to_string(),
                ),
            ],
        )?;
        log::debug!("{}", grid_in);
        let grid_in_path = self.output.join("grid.in");
        super::write_file(&grid_in_path, &grid_in)?;

        let args = [
            "-i".to_string(),
            paths::relative_to(&grid_in_path, &self.output).display().to_string(),
        ];
        exec::run(&self.config.binaries.grid, &args, Some(&self.output), None)?;
        outputs_must_exist(&[&self.energy_grid, &self.bump_grid])?;
        Ok(())
    }
}

impl Stage for GridGeneration<'_> {
    fn run(&self, _recalculate: bool) -> Result<(), Error> {
        files_must_exist(&[&self.active_site, &self.spheres])?;
        ensure_dir(&self.output)?;

        let box_file = self.create_box()?;
        self.create_grid(&box_file)?;
        Ok(())
    }

    fn output_exists(&self) -> bool {
        super::files_exist(&[&self.energy_grid, &self.bump_grid])
    }
}
