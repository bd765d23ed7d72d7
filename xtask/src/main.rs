use anyhow::Result;
use clap::Parser;

mod app;
mod arch;
mod boost;
mod cli;
mod cmake;
mod config;
mod driver;
mod exec;
mod fsutil;
mod preflight;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = crate::cli::Cli::parse();
    crate::app::run(cli)
}
