//! Run configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. Stock defaults ([`FileConfig::default`])
//! 2. The first `resizecbz.toml` found on the search path
//! 3. Command-line flags ([`Overrides`])
//!
//! The merged result is turned into an immutable [`ResizeConfig`] that is
//! passed by reference into every stage of the pipeline.
//!
//! ## Config File Location
//!
//! Searched in order, first hit wins:
//!
//! ```text
//! ./resizecbz.toml
//! ~/.config/resizecbz/resizecbz.toml
//! ~/.config/resizecbz.toml
//! ~/resizecbz.toml
//! <directory of the resizecbz executable>/resizecbz.toml
//! ```
//!
//! When none exists a documented `resizecbz.toml.sample` is written next to
//! where the user would most likely keep one.
//!
//! ## Configuration Options
//!
//! ```toml
//! resize_landscape = 768      # box edge for landscape pages that are not rotated
//! resize_portrait = 1024      # box edge for portrait pages and rotated landscape pages
//! rotate_landscape = "right"  # "left", "right" or "none"
//! resized_file_ext = ".rs"    # inserted before the original extension
//! ext_zip_or_cbz = true       # only process .cbz / .zip inputs
//! output_directory = "resized" # empty = next to the input
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{BoundingBox, Rotation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Name of the configuration file looked up on the search path.
pub const CONFIG_FILENAME: &str = "resizecbz.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Contents of `resizecbz.toml`.
///
/// All fields have defaults; a file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Box edge for landscape pages that are kept unrotated.
    pub resize_landscape: u32,
    /// Box edge for portrait pages and for rotated landscape pages.
    pub resize_portrait: u32,
    /// Rotation applied to landscape pages.
    pub rotate_landscape: Rotation,
    /// Suffix inserted between the file stem and its extension.
    pub resized_file_ext: String,
    /// Only accept `.cbz` / `.zip` inputs.
    pub ext_zip_or_cbz: bool,
    /// Where resized archives go; empty means next to the input.
    pub output_directory: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            resize_landscape: 768,
            resize_portrait: 1024,
            rotate_landscape: Rotation::Right,
            resized_file_ext: ".rs".to_string(),
            ext_zip_or_cbz: true,
            output_directory: "resized".to_string(),
        }
    }
}

impl FileConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize_landscape == 0 || self.resize_portrait == 0 {
            return Err(ConfigError::Validation(
                "resize_landscape and resize_portrait must be positive".into(),
            ));
        }
        if self.resized_file_ext.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "resized_file_ext must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(resolution) = overrides.resolution {
            self.resize_portrait = resolution.portrait;
            self.resize_landscape = resolution.landscape;
        }
        if let Some(rotation) = overrides.rotation {
            self.rotate_landscape = rotation;
        }
        if let Some(dir) = &overrides.output_directory {
            self.output_directory = dir.clone();
        }
        if let Some(ext) = &overrides.resized_file_ext {
            self.resized_file_ext = ext.clone();
        }
        if overrides.unsafe_mode {
            self.ext_zip_or_cbz = false;
        }
        self
    }

    /// Key/value pairs in file order, for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("resize_landscape", self.resize_landscape.to_string()),
            ("resize_portrait", self.resize_portrait.to_string()),
            ("rotate_landscape", self.rotate_landscape.to_string()),
            ("resized_file_ext", self.resized_file_ext.clone()),
            ("ext_zip_or_cbz", self.ext_zip_or_cbz.to_string()),
            ("output_directory", self.output_directory.clone()),
        ]
    }
}

/// Box sizes given on the command line as `N` or `WxH`.
///
/// With two values the larger one becomes the portrait box and the smaller
/// one the landscape box, so `1024x768` and `768x1024` mean the same thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub portrait: u32,
    pub landscape: u32,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("invalid resolution '{s}', expected N or WxH"))
        };
        match s.split_once(['x', 'X']) {
            Some((a, b)) => {
                let (a, b) = (parse(a)?, parse(b)?);
                Ok(Resolution {
                    portrait: a.max(b),
                    landscape: a.min(b),
                })
            }
            None => {
                let n = parse(s)?;
                Ok(Resolution {
                    portrait: n,
                    landscape: n,
                })
            }
        }
    }
}

/// Values supplied on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub resolution: Option<Resolution>,
    pub rotation: Option<Rotation>,
    pub output_directory: Option<String>,
    pub resized_file_ext: Option<String>,
    /// Disable the `.cbz` / `.zip` extension check.
    pub unsafe_mode: bool,
}

/// Resolved parameters for one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeConfig {
    pub landscape_box: BoundingBox,
    pub portrait_box: BoundingBox,
    pub rotation: Rotation,
    pub output_directory: Option<PathBuf>,
    pub output_suffix: String,
    pub strict_extension_check: bool,
}

impl ResizeConfig {
    /// Validate and convert file-level settings into the run config.
    pub fn from_file_config(config: &FileConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let output_directory = match config.output_directory.trim() {
            "" => None,
            dir => Some(PathBuf::from(dir)),
        };
        Ok(Self {
            landscape_box: BoundingBox::square(config.resize_landscape),
            portrait_box: BoundingBox::square(config.resize_portrait),
            rotation: config.rotate_landscape,
            output_directory,
            output_suffix: config.resized_file_ext.clone(),
            strict_extension_check: config.ext_zip_or_cbz,
        })
    }
}

impl Default for ResizeConfig {
    fn default() -> Self {
        let defaults = FileConfig::default();
        Self {
            landscape_box: BoundingBox::square(defaults.resize_landscape),
            portrait_box: BoundingBox::square(defaults.resize_portrait),
            rotation: defaults.rotate_landscape,
            output_directory: None,
            output_suffix: defaults.resized_file_ext,
            strict_extension_check: defaults.ext_zip_or_cbz,
        }
    }
}

// =============================================================================
// Config file discovery
// =============================================================================

/// The user's home directory, from `HOME` (or `USERPROFILE` on Windows).
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Directories searched for `resizecbz.toml`, in priority order.
pub fn search_dirs(home: Option<&Path>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(home) = home {
        let config = home.join(".config");
        dirs.push(config.join("resizecbz"));
        dirs.push(config);
        dirs.push(home.to_path_buf());
    }
    if let Some(exe_dir) = exe_dir {
        dirs.push(exe_dir.to_path_buf());
    }
    dirs
}

/// A parsed config file together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: FileConfig,
    /// `None` when no file was found and stock defaults are in effect.
    pub source: Option<PathBuf>,
}

/// Parse and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load the first `resizecbz.toml` found in `dirs`, or stock defaults.
pub fn load_config(dirs: &[PathBuf]) -> Result<LoadedConfig, ConfigError> {
    for dir in dirs {
        let path = dir.join(CONFIG_FILENAME);
        if path.is_file() {
            let config = load_config_file(&path)?;
            return Ok(LoadedConfig {
                config,
                source: Some(path),
            });
        }
    }
    Ok(LoadedConfig {
        config: FileConfig::default(),
        source: None,
    })
}

/// Directory where the sample config is written when none exists.
///
/// Windows keeps it next to the executable; elsewhere it goes to
/// `~/.config/resizecbz` when `~/.config` exists, else to `~`.
pub fn sample_dir(home: Option<&Path>, exe_dir: Option<&Path>) -> Option<PathBuf> {
    if cfg!(windows) {
        return exe_dir.map(Path::to_path_buf);
    }
    let home = home?;
    let config = home.join(".config");
    if config.is_dir() {
        Some(config.join("resizecbz"))
    } else {
        Some(home.to_path_buf())
    }
}

/// Write `resizecbz.toml.sample` into `dir` unless it is already there.
///
/// Returns the sample path and whether it was created by this call.
pub fn write_sample_config(dir: &Path) -> Result<(PathBuf, bool), ConfigError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{CONFIG_FILENAME}.sample"));
    if path.exists() {
        return Ok((path, false));
    }
    fs::write(&path, stock_config_toml())?;
    Ok((path, true))
}

/// Returns a fully-commented stock `resizecbz.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# resizecbz configuration
# =======================
# All settings are optional. Values shown below are the defaults.
# Command-line flags always override these values.

# Box edge (pixels) for landscape pages that are kept unrotated.
# Set both sizes a bit larger than your display so pages are never upscaled
# by the reader. On a device that can be turned to portrait, use the same
# value for both.
resize_landscape = 768

# Box edge (pixels) for portrait pages and for rotated landscape pages.
resize_portrait = 1024

# Rotate landscape (double) pages: "right" (clockwise), "left"
# (counter-clockwise) or "none".
rotate_landscape = "right"

# Inserted before the original extension: comic.cbz -> comic.rs.cbz
resized_file_ext = ".rs"

# Only process files ending in .cbz or .zip. Other files are skipped with a
# warning, so a whole directory can be passed with a wildcard.
ext_zip_or_cbz = true

# Directory for resized files, absolute or relative to the working
# directory. Empty puts them next to the source file.
output_directory = "resized"
"##
}
