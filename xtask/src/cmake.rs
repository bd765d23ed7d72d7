//! CMake invocation builders.
//!
//! Fluent builder for the tvOS generator step plus the `cmake --build` step.

use crate::arch::TargetArch;
use crate::exec::Invocation;
use std::path::{Path, PathBuf};

/// Minimum tvOS version for the library and for Boost.
pub const DEPLOYMENT_TARGET: &str = "10.0";

/// The one target the driver builds.
pub const BUILD_TARGET: &str = "nakama-cpp";

pub const GENERATOR: &str = "Unix Makefiles";

const SIMULATOR_SYSROOT: &str = "appletvsimulator";

/// Disables protoc/codegen and ASM in the bundled dependencies; none of them
/// can run or assemble for the tvOS target.
const BUNDLED_DEP_FLAGS: &[&str] = &[
    "-Dprotobuf_BUILD_PROTOC_BINARIES=OFF",
    "-DgRPC_BUILD_CODEGEN=OFF",
    "-DCARES_INSTALL=OFF",
    "-DCMAKE_C_FLAGS=-fembed-bitcode",
    "-DCMAKE_CXX_FLAGS=-fembed-bitcode",
    "-DOPENSSL_NO_ASM=YES",
];

/// Generator invocation for one tvOS architecture.
#[derive(Clone, Debug)]
pub struct CmakeGenerate {
    build_dir: PathBuf,
    source_dir: PathBuf,
    arch: TargetArch,
    simulator: bool,
    deployment_target: String,
    extra: Vec<String>,
}

impl CmakeGenerate {
    pub fn new(build_dir: &Path, source_dir: &Path, arch: &TargetArch) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            source_dir: source_dir.to_path_buf(),
            arch: arch.clone(),
            simulator: false,
            deployment_target: DEPLOYMENT_TARGET.to_string(),
            extra: Vec::new(),
        }
    }

    /// Build against the simulator SDK instead of the device SDK.
    pub fn simulator(mut self, simulator: bool) -> Self {
        self.simulator = simulator;
        self
    }

    /// Append platform-independent parameters (build type, linkage, ...).
    pub fn params<I>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.extra.extend(params);
        self
    }

    pub fn build(&self) -> Invocation {
        let mut inv = Invocation::new("cmake")
            .arg("-B")
            .arg(self.build_dir.to_string_lossy())
            .arg("-DCMAKE_SYSTEM_NAME=tvOS")
            .arg("-DAPPLE_TVOS=YES")
            .arg(format!(
                "-DCMAKE_OSX_DEPLOYMENT_TARGET={}",
                self.deployment_target
            ))
            .arg(format!("-DCMAKE_OSX_ARCHITECTURES={}", self.arch))
            .args(BUNDLED_DEP_FLAGS.iter().copied())
            .arg(format!("-G{GENERATOR}"))
            .arg(self.source_dir.to_string_lossy())
            .args(self.extra.iter().cloned());

        if self.simulator {
            inv = inv.arg(format!("-DCMAKE_OSX_SYSROOT={SIMULATOR_SYSROOT}"));
        }
        inv
    }
}

/// `cmake --build <build_dir> --target <target>`
pub fn build_target(build_dir: &Path, target: &str) -> Invocation {
    Invocation::new("cmake")
        .arg("--build")
        .arg(build_dir.to_string_lossy())
        .args(["--target", target])
}
