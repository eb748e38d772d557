use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dflow",
    about = "Incremental DOCK workflow orchestration",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Run configuration (TOML) with tool locations and tunables
    #[arg(
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dock the receptor's native ligand back into it
    SelfDock(SelfDockArgs),

    /// Dock a foreign ligand into a receptor defined by its native ligand
    CrossDock(CrossDockArgs),

    /// Dock a ligand anchored to a template's growth point
    AnchoredDock(AnchoredDockArgs),

    /// Grow molecules from an anchor fragment inside a prepared receptor
    Grow(GrowArgs),

    /// Generate a de novo fragment library from a set of molecules
    Fragments(FragmentsArgs),

    /// Prepare a receptor without docking anything
    Receptor(ReceptorArgs),

    /// Run a bare docking against existing spheres and grids
    Dock(DockArgs),
}

/// Options shared by every workflow command.
#[derive(Args)]
pub struct WorkflowOptions {
    /// Recalculate all intermediate results
    #[arg(long)]
    pub recalc: bool,

    /// Custom docking input template
    #[arg(long = "docking-in", value_name = "FILE")]
    pub docking_in: Option<PathBuf>,
}

#[derive(Args)]
pub struct SelfDockArgs {
    /// Protein to dock into (PDB)
    pub protein: PathBuf,

    /// Ligand defining the active site and being docked (SDF)
    pub ligand: PathBuf,

    /// Output directory for final and intermediate files
    pub output: PathBuf,

    #[command(flatten)]
    pub workflow: WorkflowOptions,
}

#[derive(Args)]
pub struct CrossDockArgs {
    /// Protein to dock into (PDB)
    pub protein: PathBuf,

    /// Native ligand defining the active site (SDF)
    pub native_ligand: PathBuf,

    /// Ligand to dock (SDF)
    pub docking_ligand: PathBuf,

    /// Output directory for final and intermediate files
    pub output: PathBuf,

    /// Reference molecule for RMSD calculation
    #[arg(long = "rmsd-reference", value_name = "FILE")]
    pub rmsd_reference: Option<PathBuf>,

    #[command(flatten)]
    pub workflow: WorkflowOptions,
}

#[derive(Args)]
pub struct AnchoredDockArgs {
    /// Protein to dock into (PDB)
    pub protein: PathBuf,

    /// Native ligand defining the active site (SDF)
    pub native_ligand: PathBuf,

    /// Ligand to dock (SDF)
    pub docking_ligand: PathBuf,

    /// Template structure with the linker marking the anchor (MOL2)
    pub template: PathBuf,

    /// Output directory for final and intermediate files
    pub output: PathBuf,

    /// Reference molecule for RMSD calculation
    #[arg(long = "rmsd-reference", value_name = "FILE")]
    pub rmsd_reference: Option<PathBuf>,

    /// Receptor preparation directory to reuse, created when absent
    #[arg(long, value_name = "DIR")]
    pub receptor: Option<PathBuf>,

    #[command(flatten)]
    pub workflow: WorkflowOptions,
}

#[derive(Args)]
pub struct GrowArgs {
    /// Protein to grow into (PDB)
    pub protein: PathBuf,

    /// Native ligand defining the active site (SDF)
    pub native_ligand: PathBuf,

    /// Anchor fragment to grow from (MOL2)
    pub anchor: PathBuf,

    /// Prefix of the fragment library to use
    pub fragment_prefix: PathBuf,

    /// Output directory for final and intermediate files
    pub output: PathBuf,

    /// Receptor preparation directory to reuse, created when absent
    #[arg(long, value_name = "DIR")]
    pub receptor: Option<PathBuf>,

    #[command(flatten)]
    pub workflow: WorkflowOptions,
}

#[derive(Args)]
pub struct FragmentsArgs {
    /// Molecules to fragment (MOL2)
    pub molecules: PathBuf,

    /// Output directory for the fragment library
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ReceptorArgs {
    /// Protein to prepare (PDB)
    pub protein: PathBuf,

    /// Native ligand defining the active site (SDF)
    pub native_ligand: PathBuf,

    /// Output directory for the receptor preparation
    pub output: PathBuf,

    /// Recalculate all intermediate results
    #[arg(long)]
    pub recalc: bool,
}

#[derive(Args)]
pub struct DockArgs {
    /// Ligand to dock (MOL2)
    pub ligand: PathBuf,

    /// Selected spheres file
    pub spheres: PathBuf,

    /// Grid prefix of an existing grid generation
    pub grid: PathBuf,

    /// Output directory for the docking run
    pub output: PathBuf,

    /// Reference molecule for RMSD calculation
    #[arg(long = "rmsd-reference", value_name = "FILE")]
    pub rmsd_reference: Option<PathBuf>,

    /// Custom docking input template
    #[arg(long = "docking-in", value_name = "FILE")]
    pub docking_in: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
