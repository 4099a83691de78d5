use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rk", about = concat!("remark v", env!("CARGO_PKG_VERSION"), " - reusable comments, sorted"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create remark.toml and an empty comment document here
    Init(InitArgs),
    /// List categories and their comments
    List(ListArgs),
    /// Add a comment to a category
    Add(AddArgs),
    /// Change a comment's text and/or move it to another category
    Edit(EditArgs),
    /// Delete a comment
    Rm(RmArgs),
    /// Delete a category and all of its comments
    RmCategory(RmCategoryArgs),
    /// Suggest categories, most used first
    Suggest(SuggestArgs),
    /// Print the raw text of a comment
    Copy(CopyArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Location of the comment document, relative to this directory
    #[arg(long)]
    pub store: Option<String>,
    /// Overwrite an existing remark.toml (the document is kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only this category
    pub category: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Comment text
    pub text: String,
    /// Category to file it under (created if missing)
    #[arg(short, long)]
    pub category: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Comment ID
    pub id: i64,
    /// New text (default: keep)
    #[arg(long)]
    pub text: Option<String>,
    /// New category (default: keep)
    #[arg(short, long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Comment ID
    pub id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct RmCategoryArgs {
    /// Category name
    pub category: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Partial category name (default: everything)
    #[arg(default_value = "")]
    pub input: String,
}

#[derive(Args)]
pub struct CopyArgs {
    /// Comment ID
    pub id: i64,
}
