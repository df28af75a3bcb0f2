use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plotweave",
    about = "Plotweave: versioned drafts for long-form writing",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the project store (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Project to open, by name or id (defaults to the first project)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Author recorded on new commits (overrides the config file)
    #[arg(long, global = true)]
    pub author: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new project with a starter chapter
    Init(InitArgs),
    /// List stored projects
    Projects,
    /// Delete a project and its whole history
    DeleteProject(DeleteProjectArgs),
    /// Show the current tree
    Tree,
    /// Print a file's content
    Cat(CatArgs),
    /// Create a folder
    Mkdir(CreateArgs),
    /// Create an empty file
    Touch(CreateArgs),
    /// Replace a file's content
    Write(WriteArgs),
    /// Remove a file or folder
    Rm(RmArgs),
    /// Rename a file or folder
    Mv(MvArgs),
    /// Show commit history of the current branch
    Log(LogArgs),
    /// Show a commit
    Show(ShowArgs),
    /// List, create, or delete branches
    Branch(BranchArgs),
    /// Switch to a different branch
    Switch(SwitchArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Project name (defaults to the configured project name)
    pub name: Option<String>,
}

#[derive(Args)]
pub struct DeleteProjectArgs {
    pub project: String,
}

#[derive(Args)]
pub struct CatArgs {
    pub path: String,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Slash-separated path; every parent folder must exist
    pub path: String,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: String,
    /// New content; read from stdin when omitted
    pub text: Option<String>,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    pub path: String,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    pub path: String,
    /// New name (nodes keep their parent folder)
    pub name: String,
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Commit id or id prefix on the current branch
    pub commit: String,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: Option<String>,
    #[arg(short = 'd', long)]
    pub delete: bool,
}

#[derive(Args)]
pub struct SwitchArgs {
    pub branch: String,
    #[arg(short = 'c', long)]
    pub create: bool,
    /// Discard uncommitted changes
    #[arg(short, long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["plotweave", "init"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.name, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_init_named() {
        let cli = Cli::try_parse_from(["plotweave", "init", "Sequel"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert_eq!(args.name, Some("Sequel".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_projects() {
        let cli = Cli::try_parse_from(["plotweave", "projects"]).unwrap();
        assert!(matches!(cli.command, Command::Projects));
    }

    #[test]
    fn parse_delete_project() {
        let cli = Cli::try_parse_from(["plotweave", "delete-project", "Old"]).unwrap();
        if let Command::DeleteProject(args) = cli.command {
            assert_eq!(args.project, "Old");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_touch_with_message() {
        let cli = Cli::try_parse_from(["plotweave", "touch", "Characters/Ada.txt", "-m", "new character"]).unwrap();
        if let Command::Touch(args) = cli.command {
            assert_eq!(args.path, "Characters/Ada.txt");
            assert_eq!(args.message, Some("new character".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_write_without_text() {
        let cli = Cli::try_parse_from(["plotweave", "write", "Chapter 1.txt"]).unwrap();
        if let Command::Write(args) = cli.command {
            assert_eq!(args.text, None);
            assert_eq!(args.message, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_mv() {
        let cli = Cli::try_parse_from(["plotweave", "mv", "Chapter 1.txt", "Prologue.txt"]).unwrap();
        if let Command::Mv(args) = cli.command {
            assert_eq!(args.path, "Chapter 1.txt");
            assert_eq!(args.name, "Prologue.txt");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_log_oneline() {
        let cli = Cli::try_parse_from(["plotweave", "log", "--oneline", "-n", "5"]).unwrap();
        if let Command::Log(args) = cli.command {
            assert!(args.oneline);
            assert_eq!(args.limit, 5);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_branch_delete() {
        let cli = Cli::try_parse_from(["plotweave", "branch", "-d", "old"]).unwrap();
        if let Command::Branch(args) = cli.command {
            assert!(args.delete);
            assert_eq!(args.name, Some("old".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_switch_create_force() {
        let cli = Cli::try_parse_from(["plotweave", "switch", "-c", "-f", "ending"]).unwrap();
        if let Command::Switch(args) = cli.command {
            assert!(args.create);
            assert!(args.force);
            assert_eq!(args.branch, "ending");
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::try_parse_from([
            "plotweave", "tree", "--data-dir", "/tmp/novels", "--project", "Sequel", "--author", "ada", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/novels")));
        assert_eq!(cli.project, Some("Sequel".into()));
        assert_eq!(cli.author, Some("ada".into()));
        assert!(matches!(cli.command, Command::Tree));
    }
}
