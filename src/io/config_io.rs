use std::fs;
use std::path::{Path, PathBuf};

use crate::io::store::{FileStore, atomic_write};
use crate::model::config::Config;

pub const CONFIG_FILE: &str = "remark.toml";
pub const DEFAULT_DOCUMENT: &str = "comments.json";

const CONFIG_TEMPLATE: &str = r##"# Every client pointed at the same document shares the same comments.
[store]
path = {store}

# Colors are #rrggbb. Everything below is optional.
[ui]
# show_key_hints = false
#
# # category colors, assigned by alphabetical rank
# palette = ["#ef4444", "#10b981", "#f59e0b", "#3b82f6", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316"]
#
# [ui.colors]
# background = "#0f172a"
# text = "#cbd5e1"
# text_bright = "#f8fafc"
# highlight = "#38bdf8"
# dim = "#64748b"
# red = "#f87171"
# green = "#34d399"
# selection_bg = "#1e293b"
"##;

/// Render remark.toml text pointing at `document`.
pub fn render_config(document: &Path) -> String {
    let quoted = toml::Value::String(document.to_string_lossy().into_owned()).to_string();
    CONFIG_TEMPLATE.replace("{store}", &quoted)
}

/// Error type for configuration discovery and loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("comment store not configured: no remark.toml found (run `rk init`)")]
    NotConfigured,
    #[error("comment store not configured: {path} has no [store] path")]
    MissingStore { path: PathBuf },
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse remark.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A loaded configuration with its store location resolved.
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Directory holding remark.toml
    pub root: PathBuf,
    pub config: Config,
    /// Absolute location of the shared document
    pub document: PathBuf,
}

impl Workspace {
    pub fn file_store(&self) -> FileStore {
        FileStore::new(&self.document)
    }
}

/// Walk up from `start` looking for a directory containing remark.toml.
pub fn discover_config(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NotConfigured);
        }
    }
}

/// Load remark.toml from `root` and resolve the document path.
pub fn load_workspace(root: &Path) -> Result<Workspace, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    let text = fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: Config = toml::from_str(&text)?;

    let store = config
        .store
        .as_ref()
        .ok_or_else(|| ConfigError::MissingStore {
            path: config_path.clone(),
        })?;
    if store.path.as_os_str().is_empty() {
        return Err(ConfigError::MissingStore { path: config_path });
    }

    let document = if store.path.is_absolute() {
        store.path.clone()
    } else {
        root.join(&store.path)
    };

    Ok(Workspace {
        root: root.to_path_buf(),
        config,
        document,
    })
}

/// Discover and load in one step.
pub fn find_workspace(start: &Path) -> Result<Workspace, ConfigError> {
    let root = discover_config(start)?;
    load_workspace(&root)
}

/// Write a default remark.toml into `root` and create an empty document if
/// none exists yet. Existing documents are never overwritten.
pub fn init_workspace(
    root: &Path,
    document: Option<&Path>,
    force: bool,
) -> Result<Workspace, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path: config_path });
    }

    let document = document.unwrap_or(Path::new(DEFAULT_DOCUMENT));
    let text = render_config(document);
    fs::create_dir_all(root)?;
    atomic_write(&config_path, text.as_bytes())?;

    let workspace = load_workspace(root)?;
    if !workspace.document.exists() {
        if let Some(parent) = workspace.document.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(&workspace.document, b"{}\n")?;
    }
    Ok(workspace)
}
