//! Boost bootstrap for the C++ REST SDK.
//!
//! The build script repository is cloned at build time into the third-party
//! tree and gitignored. Its output is exposed under `boost/{lib,include}`
//! through symbolic links, which also serve as the "already built" marker.

use crate::exec::{run_checked, Invocation, Runner};
use crate::fsutil::{ensure_linkable, makedirs, mklink};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const BUILD_SCRIPT_REPO: &str = "https://github.com/faithfracture/Apple-Boost-BuildScript";
const BUILD_SCRIPT_COMMIT: &str = "1b94ec2e2b5af1ee036d9559b96e70c113846392";
const BUILD_SCRIPT_DIR: &str = "Apple-Boost-BuildScript";

pub const BOOST_VERSION: &str = "1.69.0";
pub const BOOST_LIBS: &str = "chrono system thread";

/// Where the bootstrap lives, relative to the library source tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoostPaths {
    pub script_dir: PathBuf,
    pub boost_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
}

impl BoostPaths {
    pub fn new(project_root: &Path) -> Self {
        let cpprest_tvos = project_root.join("third_party/cpprestsdk/Build_tvOS");
        let boost_dir = cpprest_tvos.join("boost");
        Self {
            script_dir: cpprest_tvos.join(BUILD_SCRIPT_DIR),
            lib_dir: boost_dir.join("lib"),
            include_dir: boost_dir.join("include"),
            boost_dir,
        }
    }

    fn output_root(&self) -> PathBuf {
        self.script_dir
            .join("build/boost")
            .join(BOOST_VERSION)
            .join("tvos")
    }

    /// Universal (fat) static libraries produced by the build script.
    pub fn script_lib_output(&self) -> PathBuf {
        self.output_root().join("build/universal")
    }

    pub fn script_include_output(&self) -> PathBuf {
        self.output_root().join("prefix/include")
    }

    pub fn script_present(&self) -> bool {
        self.script_dir.exists()
    }

    /// Both link locations exist; a dangling link counts as missing.
    pub fn is_built(&self) -> bool {
        self.lib_dir.exists() && self.include_dir.exists()
    }
}

/// Clone the build script at the pinned commit if not present (idempotent).
pub fn ensure_script(runner: &mut dyn Runner, paths: &BoostPaths) -> Result<()> {
    if paths.script_present() {
        log::info!("[skip] Boost build script at {}", paths.script_dir.display());
        return Ok(());
    }

    log::info!("[step] Cloning {BUILD_SCRIPT_REPO}");
    run_checked(
        runner,
        &Invocation::new("git")
            .arg("clone")
            .arg(BUILD_SCRIPT_REPO)
            .arg(paths.script_dir.to_string_lossy()),
    )
    .context("Cloning the Boost build script")?;

    run_checked(
        runner,
        &Invocation::new("git")
            .args(["checkout", BUILD_SCRIPT_COMMIT])
            .current_dir(&paths.script_dir),
    )
    .with_context(|| format!("Checking out {BUILD_SCRIPT_COMMIT}"))
}

/// The build script invocation; it has to run from the script directory.
pub fn build_script_invocation(paths: &BoostPaths, deployment_target: &str) -> Invocation {
    Invocation::new(paths.script_dir.join("boost.sh").to_string_lossy())
        .args(["--min-tvos-version", deployment_target])
        .args(["-tvos", "--no-framework", "--universal"])
        .args(["--boost-libs", BOOST_LIBS])
        .args(["--boost-version", BOOST_VERSION])
        .current_dir(&paths.script_dir)
}

/// Build Boost and link its output into place unless already done.
pub fn ensure_built(
    runner: &mut dyn Runner,
    paths: &BoostPaths,
    deployment_target: &str,
) -> Result<()> {
    if paths.is_built() {
        log::info!("[skip] Boost {BOOST_VERSION} already built");
        return Ok(());
    }

    // boost.sh takes minutes; refuse before running it, not after.
    ensure_linkable(&paths.lib_dir)?;
    ensure_linkable(&paths.include_dir)?;

    log::info!("[step] Building Boost {BOOST_VERSION} ({BOOST_LIBS}) for tvOS");
    run_checked(runner, &build_script_invocation(paths, deployment_target))
        .context("Building Boost")?;

    log::info!("[step] Creating links...");
    let links = [
        (&paths.lib_dir, paths.script_lib_output()),
        (&paths.include_dir, paths.script_include_output()),
    ];
    if runner.is_dry_run() {
        for (link, target) in &links {
            println!("ln -s {} {}", target.display(), link.display());
        }
        return Ok(());
    }

    makedirs(&paths.boost_dir)?;
    for (link, target) in &links {
        mklink(link, target)?;
    }
    Ok(())
}
