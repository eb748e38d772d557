//! Run configuration: external tool locations and workflow tunables.
//!
//! A [`RunConfig`] is loaded once from a TOML file and shared by reference
//! across every stage of a pipeline invocation. Stages never mutate it.
//!
//! ```toml
//! [binaries]
//! dock = "/opt/dock6/bin/dock6"
//! protoss = "protoss"
//!
//! [parameters]
//! vdw = "/opt/dock6/parameters/vdw_AMBER_parm99.defn"
//! flex = "/opt/dock6/parameters/flex.defn"
//! flex_drive = "/opt/dock6/parameters/flex_drive.tbl"
//! sphere_radius = 3.0
//! active_site_radius = 15.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Locations of the external tools the pipeline invokes.
///
/// Values are passed verbatim as the program of a command line, so both
/// bare names resolved via `PATH` and absolute paths work.
#[derive(Debug, Clone, Deserialize)]
pub struct Binaries {
    pub protoss: String,
    pub clean_binding_site: String,
    pub chimera: String,
    pub unicon: String,
    pub dms: String,
    pub sphgen: String,
    pub sphere_selector: String,
    pub showsphere: String,
    pub showbox: String,
    pub grid: String,
    pub dock: String,
}

/// Numeric and file tunables rendered into the tool input decks.
#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    /// vdW parameter definition file, rendered into docking and grid decks.
    pub vdw: PathBuf,
    /// Flexible bond definition file.
    pub flex: PathBuf,
    /// Flexible bond drive table.
    pub flex_drive: PathBuf,
    /// Sphere selection radius around the ligand (Å).
    pub sphere_radius: f64,
    /// Active site cutout radius around the native ligand (Å).
    pub active_site_radius: f64,
    /// Molecular surface probe radius (Å).
    #[serde(default = "default_probe_radius")]
    pub probe_radius: f64,
}

fn default_probe_radius() -> f64 {
    1.4
}

/// Immutable run configuration shared by all stages of one invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub binaries: Binaries,
    pub parameters: Parameters,
}

impl RunConfig {
    /// Loads the configuration from a TOML file. Read once per invocation;
    /// never reloaded mid-run.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;

    /// A config with recognizable tool names for constructor and
    /// precondition tests; nothing gets invoked through it.
    pub(crate) fn stub_config() -> RunConfig {
        RunConfig {
            binaries: Binaries {
                protoss: "protoss".into(),
                clean_binding_site: "clean_binding_site".into(),
                chimera: "chimera".into(),
                unicon: "unicon".into(),
                dms: "dms".into(),
                sphgen: "sphgen".into(),
                sphere_selector: "sphere_selector".into(),
                showsphere: "showsphere".into(),
                showbox: "showbox".into(),
                grid: "grid".into(),
                dock: "dock6".into(),
            },
            parameters: Parameters {
                vdw: PathBuf::from("/opt/dock6/parameters/vdw_AMBER_parm99.defn"),
                flex: PathBuf::from("/opt/dock6/parameters/flex.defn"),
                flex_drive: PathBuf::from("/opt/dock6/parameters/flex_drive.tbl"),
                sphere_radius: 3.0,
                active_site_radius: 15.0,
                probe_radius: 1.4,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
[binaries]
protoss = "protoss"
clean_binding_site = "clean_binding_site"
chimera = "chimera"
unicon = "unicon"
dms = "dms"
sphgen = "sphgen"
sphere_selector = "sphere_selector"
showsphere = "showsphere"
showbox = "showbox"
grid = "grid"
dock = "dock6"

[parameters]
vdw = "/opt/dock6/parameters/vdw_AMBER_parm99.defn"
flex = "/opt/dock6/parameters/flex.defn"
flex_drive = "/opt/dock6/parameters/flex_drive.tbl"
sphere_radius = 3.0
active_site_radius = 15.0
"#;

    #[test]
    fn load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.binaries.dock, "dock6");
        assert_eq!(config.parameters.sphere_radius, 3.0);
        // probe radius falls back to the dms default
        assert_eq!(config.parameters.probe_radius, 1.4);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RunConfig::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[binaries\n").unwrap();
        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
