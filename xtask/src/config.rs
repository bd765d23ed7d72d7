//! Shared build configuration.
//!
//! Loaded once from a JSON file and handed to the driver. Required fields are
//! checked when the file is parsed, everything else in [`BuildConfig::validate`].

use crate::arch::{Linkage, TargetArch, DEFAULT_SIMULATOR_ARCHS};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// CMake build type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum BuildMode {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildMode::Debug => "Debug",
            BuildMode::Release => "Release",
            BuildMode::RelWithDebInfo => "RelWithDebInfo",
            BuildMode::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_simulator_archs() -> Vec<String> {
    DEFAULT_SIMULATOR_ARCHS.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    pub build_mode: BuildMode,
    /// Library source tree, also the CMake source directory.
    pub project_root: PathBuf,
    /// Enables the REST client and with it the Boost bootstrap.
    pub use_cpprest: bool,
    #[serde(default = "default_simulator_archs")]
    pub simulator_archs: Vec<String>,
    #[serde(default)]
    pub extra_cmake_args: Vec<String>,
}

impl BuildConfig {
    /// Read, resolve and validate the configuration at `path`.
    ///
    /// A relative `project_root` is taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Reading build config {}", path.display()))?;
        let mut config = Self::from_json(&text)
            .with_context(|| format!("Parsing build config {}", path.display()))?;

        if config.project_root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.project_root = base.join(&config.project_root);
        }
        config.project_root = config
            .project_root
            .canonicalize()
            .with_context(|| format!("Resolving project_root {}", config.project_root.display()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.project_root.is_dir() {
            bail!(
                "project_root is not a directory: {}",
                self.project_root.display()
            );
        }
        if let Some(bad) = self.simulator_archs.iter().find(|a| a.trim().is_empty()) {
            bail!("simulator_archs contains an empty name: {bad:?}");
        }
        Ok(())
    }

    pub fn is_simulator(&self, arch: &TargetArch) -> bool {
        arch.is_simulator(&self.simulator_archs)
    }

    /// Generator parameters shared by every platform, for one linkage mode.
    pub fn common_cmake_parameters(&self, linkage: Linkage) -> Vec<String> {
        let mut params = vec![
            format!("-DCMAKE_BUILD_TYPE={}", self.build_mode),
            format!("-DNAKAMA_SHARED_LIBRARY={}", on_off(linkage.is_dynamic())),
            format!("-DBUILD_REST_CLIENT={}", on_off(self.use_cpprest)),
        ];
        params.extend(self.extra_cmake_args.iter().cloned());
        params
    }
}

fn on_off(b: bool) -> &'static str {
    if b {
        "ON"
    } else {
        "OFF"
    }
}
