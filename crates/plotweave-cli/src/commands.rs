use std::io::Read;

use anyhow::{bail, Context};
use colored::Colorize;
use plotweave_sdk::{
    FileProjectStore, Node, NodeId, PlotweaveConfig, ProjectStore, ProjectSummary, Session, Tree,
};
use tracing::debug;

use crate::cli::*;

type FileSession = Session<FileProjectStore>;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let store = FileProjectStore::open(&config.data_dir)
        .with_context(|| format!("opening store at {}", config.data_dir.display()))?;
    let project = cli.project.as_deref();

    match cli.command {
        Command::Init(args) => cmd_init(store, config, args),
        Command::Projects => cmd_projects(&store),
        Command::DeleteProject(args) => cmd_delete_project(&store, args),
        Command::Tree => cmd_tree(&open_session(store, config, project)?),
        Command::Cat(args) => cmd_cat(&open_session(store, config, project)?, args),
        Command::Mkdir(args) => cmd_create(&mut open_session(store, config, project)?, args, true),
        Command::Touch(args) => cmd_create(&mut open_session(store, config, project)?, args, false),
        Command::Write(args) => cmd_write(&mut open_session(store, config, project)?, args),
        Command::Rm(args) => cmd_rm(&mut open_session(store, config, project)?, args),
        Command::Mv(args) => cmd_mv(&mut open_session(store, config, project)?, args),
        Command::Log(args) => cmd_log(&open_session(store, config, project)?, args),
        Command::Show(args) => cmd_show(&open_session(store, config, project)?, args),
        Command::Branch(args) => cmd_branch(&mut open_session(store, config, project)?, args),
        Command::Switch(args) => cmd_switch(&mut open_session(store, config, project)?, args),
    }
}

/// Config file (if any) with command-line overrides applied.
fn load_config(cli: &Cli) -> anyhow::Result<PlotweaveConfig> {
    let mut config = match &cli.config {
        Some(path) => PlotweaveConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlotweaveConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(author) = &cli.author {
        config.author = Some(author.clone());
    }
    debug!(?config, "resolved config");
    Ok(config)
}

fn open_session(
    store: FileProjectStore,
    config: PlotweaveConfig,
    project: Option<&str>,
) -> anyhow::Result<FileSession> {
    let session = match project {
        Some(wanted) => {
            let summary = find_project(&store, wanted)?;
            Session::open_project(store, config, &summary.id)?
        }
        None => Session::open(store, config)?,
    };
    Ok(session)
}

/// Look a project up by exact name, then by id prefix.
fn find_project(store: &FileProjectStore, wanted: &str) -> anyhow::Result<ProjectSummary> {
    let projects = store.list()?;
    if let Some(found) = projects.iter().find(|p| p.name == wanted) {
        return Ok(found.clone());
    }
    let matches: Vec<_> = projects
        .into_iter()
        .filter(|p| p.id.to_string().starts_with(wanted))
        .collect();
    match matches.as_slice() {
        [one] => Ok(one.clone()),
        [] => bail!("no project named or identified by {wanted:?}"),
        _ => bail!("project id prefix {wanted:?} is ambiguous"),
    }
}

/// Split `a/b/c` into the parent folder (if any) and the final name.
fn resolve_parent(session: &FileSession, path: &str) -> anyhow::Result<(Option<NodeId>, String)> {
    let path = path.trim_matches('/');
    match path.rsplit_once('/') {
        Some((parent, name)) => {
            let folder = session.resolve(parent)?;
            if !folder.is_folder() {
                bail!("{parent} is not a folder");
            }
            Ok((Some(*folder.id()), name.to_string()))
        }
        None => Ok((None, path.to_string())),
    }
}

fn commit_edit(session: &mut FileSession, message: Option<String>, generated: String) -> anyhow::Result<()> {
    let summary = session.commit(&message.unwrap_or(generated))?;
    println!(
        "{} [{} {}] {}",
        "✓".green().bold(),
        session.current_branch()?.name().yellow(),
        summary.short_id.dimmed(),
        summary.message
    );
    Ok(())
}

fn cmd_init(store: FileProjectStore, config: PlotweaveConfig, args: InitArgs) -> anyhow::Result<()> {
    let name = args.name.unwrap_or_else(|| config.project_name.clone());
    let session = Session::create_project(store, config, &name)?;
    let project = session.project();
    println!("{} Created project {}", "✓".green().bold(), project.name().bold());
    println!("  Id: {}", project.id().to_string().cyan());
    println!("  Branch: {}", session.current_branch()?.name().yellow());
    Ok(())
}

fn cmd_projects(store: &FileProjectStore) -> anyhow::Result<()> {
    let projects = store.list()?;
    if projects.is_empty() {
        println!("No projects.");
    }
    for p in projects {
        println!("{}  {}", p.id.short_id().yellow(), p.name);
    }
    Ok(())
}

fn cmd_delete_project(store: &FileProjectStore, args: DeleteProjectArgs) -> anyhow::Result<()> {
    let summary = find_project(store, &args.project)?;
    store.delete(&summary.id)?;
    println!("Deleted project {}", summary.name.bold());
    Ok(())
}

fn print_tree(tree: &Tree, active: Option<&NodeId>) {
    if tree.is_empty() {
        println!("  (empty)");
    }
    for (depth, node) in tree.iter() {
        let indent = "  ".repeat(depth + 1);
        if node.is_folder() {
            println!("{indent}{}", format!("{}/", node.name()).blue().bold());
        } else if Some(node.id()) == active {
            println!("{indent}{} {}", node.name().green(), "*".green());
        } else {
            println!("{indent}{}", node.name());
        }
    }
}

fn cmd_tree(session: &FileSession) -> anyhow::Result<()> {
    println!(
        "{} on branch {}",
        session.project().name().bold(),
        session.current_branch()?.name().yellow().bold()
    );
    print_tree(session.working_tree(), session.active_file().map(Node::id));
    Ok(())
}

fn cmd_cat(session: &FileSession, args: CatArgs) -> anyhow::Result<()> {
    let node = session.resolve(&args.path)?;
    match node.content() {
        Some(content) => println!("{content}"),
        None => bail!("{} is a folder", args.path),
    }
    Ok(())
}

fn cmd_create(session: &mut FileSession, args: CreateArgs, folder: bool) -> anyhow::Result<()> {
    let (parent, name) = resolve_parent(session, &args.path)?;
    if folder {
        session.add_folder(&name, parent.as_ref())?;
    } else {
        session.add_file(&name, parent.as_ref())?;
    }
    let kind = if folder { "folder" } else { "file" };
    commit_edit(session, args.message, format!("Add {kind} {}", args.path))
}

fn cmd_write(session: &mut FileSession, args: WriteArgs) -> anyhow::Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading content from stdin")?;
            text
        }
    };
    let node = session.resolve(&args.path)?;
    if node.content() == Some(text.as_str()) {
        println!("No changes.");
        return Ok(());
    }
    let id = *node.id();
    session.write_file(&id, &text)?;
    commit_edit(session, args.message, format!("Edit {}", args.path))
}

fn cmd_rm(session: &mut FileSession, args: RmArgs) -> anyhow::Result<()> {
    let id = *session.resolve(&args.path)?.id();
    session.remove(&id);
    commit_edit(session, args.message, format!("Remove {}", args.path))
}

fn cmd_mv(session: &mut FileSession, args: MvArgs) -> anyhow::Result<()> {
    let id = *session.resolve(&args.path)?.id();
    session.rename(&id, &args.name)?;
    commit_edit(
        session,
        args.message,
        format!("Rename {} to {}", args.path, args.name),
    )
}

fn cmd_log(session: &FileSession, args: LogArgs) -> anyhow::Result<()> {
    let branch = session.current_branch()?.name().to_string();
    for (i, commit) in session.log(args.limit)?.iter().enumerate() {
        if args.oneline {
            println!("{} {}", commit.short_id.yellow(), commit.message);
            continue;
        }
        if i == 0 {
            println!("{}  ({})", format!("commit {}", commit.id).yellow().bold(), branch.green());
        } else {
            println!("{}", format!("commit {}", commit.id).yellow());
        }
        println!("Author: {}", commit.author);
        println!("Date:   {}", commit.timestamp);
        println!("\n    {}\n", commit.message);
    }
    Ok(())
}

fn cmd_show(session: &FileSession, args: ShowArgs) -> anyhow::Result<()> {
    let commit = session.show(&args.commit)?;
    println!("{}", format!("commit {}", commit.id()).yellow().bold());
    println!("Author: {}", commit.author());
    println!("Date:   {}", commit.timestamp());
    println!("\n    {}\n", commit.message());
    print_tree(commit.snapshot(), None);
    Ok(())
}

fn cmd_branch(session: &mut FileSession, args: BranchArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) if args.delete => {
            session.delete_branch(&name)?;
            println!("Deleted branch {}", name.yellow());
        }
        Some(name) => {
            session.create_branch(&name)?;
            println!("Created branch {}", name.yellow());
        }
        None if args.delete => bail!("branch name required with --delete"),
        None => {
            for info in session.branches() {
                let commits = format!("({} commits)", info.commit_count).dimmed();
                if info.is_current {
                    println!("* {} {commits}", info.name.green().bold());
                } else {
                    println!("  {} {commits}", info.name);
                }
            }
        }
    }
    Ok(())
}

fn cmd_switch(session: &mut FileSession, args: SwitchArgs) -> anyhow::Result<()> {
    if args.create {
        session.create_branch(&args.branch)?;
    }
    if args.force {
        session.force_switch_branch(&args.branch)?;
    } else {
        session.switch_branch(&args.branch)?;
    }
    if args.create {
        println!("Created and switched to {}", args.branch.yellow().bold());
    } else {
        println!("Switched to {}", args.branch.yellow().bold());
    }
    Ok(())
}
