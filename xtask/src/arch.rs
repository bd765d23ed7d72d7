//! Target descriptor: architecture name and linkage mode.

use anyhow::{bail, Result};
use std::fmt;

/// Architecture names that target the Apple TV simulator SDK unless the
/// configuration says otherwise.
pub const DEFAULT_SIMULATOR_ARCHS: &[&str] = &["x86_64"];

/// Target CPU architecture as passed to `CMAKE_OSX_ARCHITECTURES`.
///
/// The set of names is open-ended and the name is kept exactly as given;
/// only an empty or all-whitespace name is rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetArch(String);

impl TargetArch {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this architecture is one of the known simulator
    /// architectures.
    pub fn is_simulator<S: AsRef<str>>(&self, simulator_archs: &[S]) -> bool {
        simulator_archs.iter().any(|a| a.as_ref() == self.0)
    }
}

impl TryFrom<&str> for TargetArch {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            bail!("Architecture name must not be empty");
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Library linkage mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Linkage {
    #[default]
    Static,
    Dynamic,
}

impl Linkage {
    pub fn from_dylib_flag(dylib: bool) -> Self {
        if dylib {
            Linkage::Dynamic
        } else {
            Linkage::Static
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, Linkage::Dynamic)
    }
}
