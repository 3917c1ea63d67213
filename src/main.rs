//! # harbour CLI Entry Point
//!
//! Parses CLI arguments using clap and routes commands to the handlers in
//! the library crate.
//!
//! ## Command Structure
//!
//! - **Project**: `new`
//! - **Build**: `build`, `run`, `make`
//! - **Shell**: `completion`

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use inquire::Text;
use std::path::PathBuf;

use harbour::build::{self, BuildOptions};
use harbour::commands::new::{NewOptions, run_new};
use harbour::logging;

#[derive(Parser)]
#[command(name = "harbour")]
#[command(about = "Scaffold, build and run CMake C++ projects", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show debug logs (command lines, captured output)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project, build it and run it
    New {
        /// Project name (prompted when omitted)
        name: Option<String>,
        /// C++ standard version
        #[arg(short = 'v', long = "std", default_value_t = 17)]
        cpp_version: u32,
        /// Runtime output directory for binaries
        #[arg(short = 'b', long = "bin", default_value = "bin")]
        runtime_bin: String,
        /// Runtime output directory for libraries
        #[arg(short = 'l', long = "lib", default_value = "lib")]
        runtime_lib: String,
        /// Generate debug.hpp and build with -DDEBUG
        #[arg(short = 'g', long = "debug")]
        debug: bool,
        /// Fetch GLFW, GLM and GLAD and link against them
        #[arg(short = 'G', long = "graphics")]
        graphics: bool,
    },
    /// Configure and compile the project
    Build {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Build the debug profile with -DDEBUG
        #[arg(short, long)]
        debug: bool,
        /// Remove the build directory first
        #[arg(short, long)]
        clean: bool,
    },
    /// Run the most recently built binary
    Run {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Arguments passed to the program
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Build, then run the output binary
    Make {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Build the debug profile with -DDEBUG
        #[arg(short, long)]
        debug: bool,
        /// Remove the build directory first
        #[arg(short, long)]
        clean: bool,
        /// Arguments passed to the program
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ok = match &cli.command {
        Some(Commands::New {
            name,
            cpp_version,
            runtime_bin,
            runtime_lib,
            debug,
            graphics,
        }) => {
            let name = match name {
                Some(n) => n.clone(),
                None => Text::new("What is your project name?")
                    .with_default("my-app")
                    .prompt()?,
            };
            run_new(&NewOptions {
                name,
                cpp_version: *cpp_version,
                runtime_bin: runtime_bin.clone(),
                runtime_lib: runtime_lib.clone(),
                enable_debug: *debug,
                enable_graphics: *graphics,
            })?
        }
        Some(Commands::Build { path, debug, clean }) => build::build_project(
            path,
            &BuildOptions {
                debug: *debug,
                clean: *clean,
            },
        )?,
        Some(Commands::Run { path, args }) => build::run_project(path, args)?,
        Some(Commands::Make {
            path,
            debug,
            clean,
            args,
        }) => build::build_and_run(
            path,
            &BuildOptions {
                debug: *debug,
                clean: *clean,
            },
            args,
        )?,
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            true
        }
        None => {
            Cli::command().print_help()?;
            false
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
