//! The tvOS build sequence.
//!
//! Straight-line: build dir, optional Boost bootstrap, CMake generate,
//! CMake build. The first failing step aborts the run.

use crate::arch::{Linkage, TargetArch};
use crate::boost::{self, BoostPaths};
use crate::cmake::{self, CmakeGenerate, BUILD_TARGET, DEPLOYMENT_TARGET};
use crate::config::BuildConfig;
use crate::exec::{run_checked, Runner};
use crate::fsutil::makedirs;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// What to build
#[derive(Clone, Debug)]
pub struct BuildRequest {
    pub arch: TargetArch,
    pub linkage: Linkage,
}

/// `./build/<mode>/<arch>`, relative to the driver's working directory.
pub fn build_dir(config: &BuildConfig, arch: &TargetArch) -> PathBuf {
    Path::new(".")
        .join("build")
        .join(config.build_mode.as_str())
        .join(arch.as_str())
}

pub struct Driver<'a> {
    config: &'a BuildConfig,
    work_dir: PathBuf,
    runner: &'a mut dyn Runner,
}

impl<'a> Driver<'a> {
    pub fn new(config: &'a BuildConfig, work_dir: &Path, runner: &'a mut dyn Runner) -> Self {
        Self {
            config,
            work_dir: work_dir.to_path_buf(),
            runner,
        }
    }

    pub fn run(&mut self, req: &BuildRequest) -> Result<()> {
        log::info!(
            "Building for AppleTV. arch: {}, dylib: {}",
            req.arch,
            req.linkage.is_dynamic()
        );

        let simulator = self.config.is_simulator(&req.arch);
        let build_dir = build_dir(self.config, &req.arch);
        log::info!(
            "[info] Build dir: {} ({})",
            build_dir.display(),
            if simulator { "simulator" } else { "device" }
        );

        self.prepare_build_dir(&build_dir)?;

        if self.config.use_cpprest {
            let paths = BoostPaths::new(&self.config.project_root);
            boost::ensure_script(self.runner, &paths)?;
            boost::ensure_built(self.runner, &paths, DEPLOYMENT_TARGET)?;
        }

        log::info!("[step] Generating project");
        let generate = CmakeGenerate::new(&build_dir, &self.config.project_root, &req.arch)
            .params(self.config.common_cmake_parameters(req.linkage))
            .simulator(simulator)
            .build()
            .current_dir(&self.work_dir);
        run_checked(self.runner, &generate).context("CMake generation failed")?;

        log::info!("[step] building {BUILD_TARGET}...");
        let build = cmake::build_target(&build_dir, BUILD_TARGET).current_dir(&self.work_dir);
        run_checked(self.runner, &build)
            .with_context(|| format!("Building target {BUILD_TARGET} failed"))?;

        log::info!("[ok] {BUILD_TARGET} built in {}", build_dir.display());
        Ok(())
    }

    fn prepare_build_dir(&self, build_dir: &Path) -> Result<()> {
        if self.runner.is_dry_run() {
            println!("mkdir -p {}", build_dir.display());
            return Ok(());
        }
        makedirs(&self.work_dir.join(build_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildMode;
    use crate::exec::testing::RecordingRunner;
    use crate::exec::{DryRunRunner, Invocation, Outcome};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
        config: BuildConfig,
    }

    impl Fixture {
        fn new(use_cpprest: bool) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let root = tmp.path().join("src");
            fs::create_dir_all(tmp.path().join("work")).unwrap();
            fs::create_dir_all(&root).unwrap();
            let config = BuildConfig {
                build_mode: BuildMode::Release,
                project_root: root,
                use_cpprest,
                simulator_archs: vec!["x86_64".to_string()],
                extra_cmake_args: Vec::new(),
            };
            Self { tmp, config }
        }

        fn work_dir(&self) -> PathBuf {
            self.tmp.path().join("work")
        }

        fn run(&self, runner: &mut dyn Runner, arch: &str, dylib: bool) -> Result<()> {
            let work_dir = self.work_dir();
            let req = BuildRequest {
                arch: TargetArch::try_from(arch).unwrap(),
                linkage: Linkage::from_dylib_flag(dylib),
            };
            Driver::new(&self.config, &work_dir, runner).run(&req)
        }
    }

    fn generate_call(runner: &RecordingRunner) -> &Invocation {
        runner
            .calls
            .iter()
            .find(|c| c.args.first().map(String::as_str) == Some("-B"))
            .unwrap()
    }

    #[test]
    fn test_build_dir_layout() {
        let fx = Fixture::new(false);
        let arch = TargetArch::try_from("arm64").unwrap();
        assert_eq!(
            build_dir(&fx.config, &arch),
            PathBuf::from("./build/Release/arm64")
        );
    }

    #[test]
    fn test_device_build_without_bootstrap() {
        let fx = Fixture::new(false);
        let mut runner = RecordingRunner::default();

        fx.run(&mut runner, "arm64", false).unwrap();

        assert_eq!(runner.programs(), vec!["cmake", "cmake"]);
        assert!(fx.work_dir().join("build/Release/arm64").is_dir());
        assert!(!fx
            .config
            .project_root
            .join("third_party/cpprestsdk/Build_tvOS/boost")
            .exists());

        let generate = generate_call(&runner);
        assert!(generate.has_arg("-DCMAKE_OSX_DEPLOYMENT_TARGET=10.0"));
        assert!(generate.has_arg("-DCMAKE_OSX_ARCHITECTURES=arm64"));
        assert!(generate.has_arg("-DNAKAMA_SHARED_LIBRARY=OFF"));
        assert!(!generate.has_arg("-DCMAKE_OSX_SYSROOT=appletvsimulator"));
        assert_eq!(generate.cwd.as_deref(), Some(fx.work_dir().as_path()));
    }

    #[test]
    fn test_simulator_build_overrides_sysroot() {
        let fx = Fixture::new(false);
        let mut runner = RecordingRunner::default();

        fx.run(&mut runner, "x86_64", true).unwrap();

        let generate = generate_call(&runner);
        assert!(generate.has_arg("-DCMAKE_OSX_SYSROOT=appletvsimulator"));
        assert!(generate.has_arg("-DCMAKE_OSX_ARCHITECTURES=x86_64"));
        assert!(generate.has_arg("-DNAKAMA_SHARED_LIBRARY=ON"));
    }

    #[test]
    fn test_driver_requests_single_target() {
        let fx = Fixture::new(false);
        let mut runner = RecordingRunner::default();

        fx.run(&mut runner, "arm64", false).unwrap();

        let last = runner.calls.last().unwrap();
        assert_eq!(
            last.args,
            vec!["--build", "./build/Release/arm64", "--target", "nakama-cpp"]
        );
    }

    #[test]
    fn test_bootstrap_from_scratch() {
        let fx = Fixture::new(true);
        let mut runner = RecordingRunner::default();

        // Recording runner does not produce the build script output, so the
        // links end up dangling; the sequence is what matters here.
        fx.run(&mut runner, "arm64", false).unwrap();

        let programs = runner.programs();
        assert_eq!(programs.len(), 5);
        assert_eq!(&programs[..2], ["git", "git"]);
        assert!(programs[2].ends_with("boost.sh"));
        assert_eq!(&programs[3..], ["cmake", "cmake"]);
        assert!(generate_call(&runner).has_arg("-DBUILD_REST_CLIENT=ON"));
    }

    #[test]
    fn test_bootstrap_skipped_when_built() {
        let fx = Fixture::new(true);
        let paths = BoostPaths::new(&fx.config.project_root);
        fs::create_dir_all(&paths.script_dir).unwrap();
        fs::create_dir_all(&paths.lib_dir).unwrap();
        fs::create_dir_all(&paths.include_dir).unwrap();
        let mut runner = RecordingRunner::default();

        fx.run(&mut runner, "arm64", false).unwrap();

        assert_eq!(runner.programs(), vec!["cmake", "cmake"]);
    }

    #[test]
    fn test_generate_failure_stops_before_build() {
        let fx = Fixture::new(false);
        let mut runner = RecordingRunner::failing_on("cmake", Outcome::Failed { code: 1 });

        let err = fx.run(&mut runner, "arm64", false).unwrap_err();

        assert_eq!(runner.calls.len(), 1);
        assert!(format!("{err:#}").contains("exit code 1"));
    }

    #[test]
    fn test_clone_failure_stops_everything() {
        let fx = Fixture::new(true);
        let mut runner = RecordingRunner::failing_on("git", Outcome::Signaled { signal: 2 });

        assert!(fx.run(&mut runner, "arm64", false).is_err());
        assert_eq!(runner.programs(), vec!["git"]);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fx = Fixture::new(true);
        let mut runner = DryRunRunner;

        fx.run(&mut runner, "x86_64", true).unwrap();

        assert!(!fx.work_dir().join("build").exists());
        assert!(!fx.config.project_root.join("third_party").exists());
    }
}
