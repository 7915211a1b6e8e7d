use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use stowage::commands::{self, Config};
use stowage::package::{PackageName, VersionName};
use stowage::runtime::RealRuntime;

/// stowage - versioned package management on top of GNU Stow
///
/// Keeps every manually built version of a package under a repository root
/// and exposes exactly one of them through a `current` symlink that stow
/// links into the target directory.
///
/// Examples:
///   stowage install gcc 13.2 /tmp/gcc-build   # copy and link a version
///   stowage stow gcc 12.3                     # switch the linked version
///   stowage ls gcc                            # versions, current marked
#[derive(Parser, Debug)]
#[command(author, version = env!("STOWAGE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root holding package/version directories
    #[arg(
        long = "dir",
        short = 'd',
        env = "STOWAGE_DIR",
        value_name = "DIR",
        global = true
    )]
    repo_root: Option<PathBuf>,

    /// Directory stow links into (defaults to the parent of the repository
    /// root)
    #[arg(
        long = "target",
        short = 't',
        env = "STOWAGE_TARGET",
        value_name = "DIR",
        global = true
    )]
    target: Option<PathBuf>,

    /// Link individual files instead of folding whole directories
    #[arg(long = "no-folding", env = "STOWAGE_NO_FOLDING", global = true)]
    no_folding: bool,

    /// Forwarded to stow as --verbose=N (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install a package version from a directory tree
    Install(InstallArgs),

    /// Remove a version, or a whole package with all its versions
    Uninstall(UninstallArgs),

    /// Link a specific installed version into the target directory
    Stow(StowArgs),

    /// Delete the stowed symlinks of one or more packages
    Unstow(UnstowArgs),

    /// Unlink and relink the current version to pick up new files
    Restow(RestowArgs),

    /// List packages, or the versions of one package
    Ls(LsArgs),
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    package: PackageName,
    version: VersionName,
    /// Directory tree to install from
    path: PathBuf,

    /// Skip the reinstall confirmation
    #[arg(short = 'y', long = "yes")]
    yes: bool,
}

#[derive(clap::Args, Debug)]
struct UninstallArgs {
    package: PackageName,
    version: Option<VersionName>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes")]
    yes: bool,
}

#[derive(clap::Args, Debug)]
struct StowArgs {
    package: PackageName,
    version: VersionName,
}

#[derive(clap::Args, Debug)]
struct UnstowArgs {
    #[arg(required = true)]
    packages: Vec<PackageName>,
}

#[derive(clap::Args, Debug)]
struct RestowArgs {
    package: PackageName,
}

#[derive(clap::Args, Debug)]
struct LsArgs {
    package: Option<PackageName>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            let code = err
                .downcast_ref::<stowage::Error>()
                .map_or(1, stowage::Error::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::new(
        RealRuntime,
        cli.repo_root,
        cli.target,
        cli.no_folding,
        cli.verbose,
    )?;

    match cli.command {
        Commands::Install(args) => commands::install(
            &config,
            &args.package,
            &args.version,
            &args.path,
            args.yes,
        ),
        Commands::Uninstall(args) => {
            commands::uninstall(&config, &args.package, args.version.as_ref(), args.yes)
        }
        Commands::Stow(args) => commands::stow(&config, &args.package, &args.version),
        Commands::Unstow(args) => commands::unstow(&config, &args.packages),
        Commands::Restow(args) => commands::restow(&config, &args.package),
        Commands::Ls(args) => commands::list(&config, args.package.as_ref()),
    }
}
