mod init;
pub use init::cmd_init;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::ops::session::Session;
use crate::ops::suggest::suggest;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let start = start_dir(cli.project_dir.as_deref())?;

    match cli.command {
        None => {
            eprintln!("no subcommand given (try `rk --help`)");
            Ok(())
        }
        Some(cmd) => match cmd {
            // Init runs before a config exists, so it skips store discovery
            Commands::Init(args) => cmd_init(args, &start),

            // Read commands
            Commands::List(args) => cmd_list(args, &start, json),
            Commands::Suggest(args) => cmd_suggest(args, &start, json),
            Commands::Copy(args) => cmd_copy(args, &start),

            // Write commands
            Commands::Add(args) => cmd_add(args, &start, json),
            Commands::Edit(args) => cmd_edit(args, &start, json),
            Commands::Rm(args) => cmd_rm(args, &start),
            Commands::RmCategory(args) => cmd_rm_category(args, &start),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the directory to search from: `-C` if given, else the cwd.
pub fn start_dir(project_dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match project_dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

fn open_session(start: &Path) -> Result<Session, Box<dyn std::error::Error>> {
    let workspace = config_io::find_workspace(start)?;
    Ok(Session::load(Box::new(workspace.file_store()))?)
}

/// Ask a yes/no question on stdin. Anything but y/yes (including EOF) is no.
fn confirm(prompt: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [y/N] ", prompt)?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, start: &Path, json: bool) -> CmdResult {
    let session = open_session(start)?;
    let only = args.category.as_deref();
    if json {
        return print_json(&categories_to_json(session.store(), only));
    }
    if session.store().is_empty() {
        println!("no comments yet");
        return Ok(());
    }
    print!("{}", format_categories(session.store(), only));
    Ok(())
}

fn cmd_suggest(args: SuggestArgs, start: &Path, json: bool) -> CmdResult {
    let session = open_session(start)?;
    let list = suggest(session.store(), &args.input);
    if json {
        return print_json(&suggestions_to_json(&list));
    }
    print!("{}", format_suggestions(&list));
    Ok(())
}

fn cmd_copy(args: CopyArgs, start: &Path) -> CmdResult {
    let session = open_session(start)?;
    // Unknown ids print nothing, like every other lookup miss
    if let Some((_, comment)) = session.store().find_anywhere(args.id) {
        println!("{}", comment.text);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, start: &Path, json: bool) -> CmdResult {
    let mut session = open_session(start)?;
    let id = session.add_comment(&args.text, &args.category)?;
    if json {
        return print_json(&MutationJson {
            id,
            category: args.category.trim().to_string(),
        });
    }
    println!("{}", id);
    Ok(())
}

fn cmd_edit(args: EditArgs, start: &Path, json: bool) -> CmdResult {
    let mut session = open_session(start)?;
    let (category, text) = match session.store().find_anywhere(args.id) {
        Some((holder, comment)) => (holder.to_string(), comment.text.clone()),
        None => return Ok(()),
    };

    session.begin_edit(args.id, &category);
    let new_text = args.text.unwrap_or(text);
    let new_category = args.category.unwrap_or(category);
    session.commit_edit(&new_text, &new_category)?;

    if json {
        return print_json(&MutationJson {
            id: args.id,
            category: new_category.trim().to_string(),
        });
    }
    Ok(())
}

fn cmd_rm(args: RmArgs, start: &Path) -> CmdResult {
    let mut session = open_session(start)?;
    let category = match session.store().find_anywhere(args.id) {
        Some((holder, _)) => holder.to_string(),
        None => return Ok(()),
    };
    if !args.yes && !confirm("Are you sure you want to delete this comment?")? {
        eprintln!("aborted");
        return Ok(());
    }
    session.delete_comment(args.id, &category)?;
    Ok(())
}

fn cmd_rm_category(args: RmCategoryArgs, start: &Path) -> CmdResult {
    let mut session = open_session(start)?;
    let prompt = format!(
        "Are you sure you want to delete the entire \"{}\" category and all its comments?",
        args.category
    );
    if !args.yes && !confirm(&prompt)? {
        eprintln!("aborted");
        return Ok(());
    }
    let removed = session.delete_category(&args.category)?;
    eprintln!("deleted {} comment(s)", removed);
    Ok(())
}
