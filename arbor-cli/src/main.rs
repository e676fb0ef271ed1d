//! Arbor CLI - Command line interface for arbor
//!
//! Create, attach to, and safely destroy git worktrees bound to feature branches.

mod commands;
mod shell;
mod terminal;

use arbor_core::Config;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{AttachArgs, CreateArgs, DestroyArgs};

/// Arbor: branch-bound git worktrees with safe teardown
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Remote checked for pushed branch tips (overrides config and env)
    #[arg(long, global = true, env = "ARBOR_REMOTE")]
    remote: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a worktree for a branch and switch to it
    Create(CreateArgs),

    /// Attach to an existing worktree (interactive without a branch name)
    Attach(AttachArgs),

    /// Remove a worktree and delete its branch (interactive without a branch name)
    Destroy(DestroyArgs),

    /// List worktrees bound to branches
    #[command(visible_alias = "ls")]
    List,

    /// Show current configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", err.render());
            std::process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    let config = Config::load_with_overrides(cli.remote.clone())?;
    tracing::debug!(
        remote = %config.git.remote,
        shell = %config.shell(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Create(args) => args.execute(&config)?,
        Commands::Attach(args) => args.execute(&config)?,
        Commands::Destroy(args) => args.execute(&config)?,
        Commands::List => commands::list::execute(&config)?,
        Commands::Config => show_config(&config),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "arbor_cli=debug,arbor_core=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn show_config(config: &Config) {
    println!("Arbor Configuration");
    println!("===================");
    println!();
    println!("Workspace Settings:");
    println!("  shell: {}", config.shell());
    if config.workspace.command.is_empty() {
        println!("  command: (none)");
    } else {
        println!("  command: {}", shell::command_line(&config.workspace.command));
    }
    println!("  copy_untracked: {}", config.workspace.copy_untracked.join(", "));
    println!();
    println!("Git Settings:");
    println!("  remote: {}", config.git.remote);
    println!(
        "  main_branch_candidates: {}",
        config.git.main_branch_candidates.join(", ")
    );
    println!();
    if let Some(path) = Config::config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from(["arbor", "create", "feature-x"]).unwrap();
        match cli.command {
            Commands::Create(args) => assert_eq!(args.branch, "feature-x"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_exactly_one_branch() {
        assert!(Cli::try_parse_from(["arbor", "create"]).is_err());
        assert!(Cli::try_parse_from(["arbor", "create", "a", "b"]).is_err());
    }

    #[test]
    fn test_parse_attach_modes() {
        let cli = Cli::try_parse_from(["arbor", "attach"]).unwrap();
        assert!(matches!(cli.command, Commands::Attach(AttachArgs { branch: None })));

        let cli = Cli::try_parse_from(["arbor", "attach", "feature-x"]).unwrap();
        assert!(
            matches!(cli.command, Commands::Attach(AttachArgs { branch: Some(ref b) }) if b == "feature-x")
        );

        assert!(Cli::try_parse_from(["arbor", "attach", "a", "b"]).is_err());
    }

    #[test]
    fn test_parse_destroy_force_anywhere() {
        for argv in [
            vec!["arbor", "destroy", "--force", "feature-x"],
            vec!["arbor", "destroy", "feature-x", "--force"],
        ] {
            let cli = Cli::try_parse_from(argv).unwrap();
            match cli.command {
                Commands::Destroy(args) => {
                    assert!(args.force);
                    assert_eq!(args.branch.as_deref(), Some("feature-x"));
                }
                other => panic!("unexpected command {:?}", other),
            }
        }

        let cli = Cli::try_parse_from(["arbor", "destroy", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Destroy(DestroyArgs { branch: None, force: true })
        ));
    }

    #[test]
    fn test_destroy_rejects_two_branches() {
        assert!(Cli::try_parse_from(["arbor", "destroy", "a", "b"]).is_err());
        assert!(Cli::try_parse_from(["arbor", "destroy", "a", "--force", "b"]).is_err());
    }

    #[test]
    fn test_unknown_and_missing_command() {
        let err = Cli::try_parse_from(["arbor", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);

        assert!(Cli::try_parse_from(["arbor"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["arbor", "destroy", "-v", "--remote", "upstream"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.remote.as_deref(), Some("upstream"));
    }
}
