use crate::arch::{Linkage, TargetArch};
use crate::config::BuildConfig;
use crate::driver::{BuildRequest, Driver};
use crate::exec::{DryRunRunner, Runner, SystemRunner};
use anyhow::{Context, Result};

pub fn run(cli: crate::cli::Cli) -> Result<()> {
    let req = BuildRequest {
        arch: TargetArch::try_from(cli.arch.as_str())?,
        linkage: Linkage::from_dylib_flag(cli.dylib),
    };
    let config = BuildConfig::load(&cli.config)?;
    log::debug!("{config:?}");

    if !cli.dry_run {
        crate::preflight::check_tools(&crate::preflight::required_tools(config.use_cpprest))?;
    }

    let work_dir = std::env::current_dir().context("Reading current directory")?;
    let mut system = SystemRunner;
    let mut dry = DryRunRunner;
    let runner: &mut dyn Runner = if cli.dry_run { &mut dry } else { &mut system };

    Driver::new(&config, &work_dir, runner).run(&req)
}
