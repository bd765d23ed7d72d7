use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "build-tvos")]
#[command(about = "Builder for tvOS: configures and builds the client library with CMake")]
pub struct Cli {
    /// Architecture, e.g. arm64 x86_64
    pub arch: String,

    /// Build a dynamic library instead of a static one.
    #[arg(long)]
    pub dylib: bool,

    /// Shared build configuration (JSON).
    #[arg(long, value_name = "PATH", default_value = "../build_config.json")]
    pub config: PathBuf,

    /// Print the commands instead of running them.
    #[arg(long)]
    pub dry_run: bool,
}
