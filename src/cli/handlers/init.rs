use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;

pub fn cmd_init(args: InitArgs, start: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // A config further up would otherwise have been used from here
    if let Some(parent) = start.parent()
        && let Ok(parent_root) = config_io::discover_config(parent)
    {
        eprintln!(
            "Note: parent config found at {}",
            parent_root.join(config_io::CONFIG_FILE).display()
        );
        eprintln!("Creating a new one in {}", start.display());
    }

    let workspace = config_io::init_workspace(start, args.store.as_deref().map(Path::new), args.force)?;

    println!(
        "Created {}",
        workspace.root.join(config_io::CONFIG_FILE).display()
    );
    println!("Comments are stored in {}", workspace.document.display());
    Ok(())
}
