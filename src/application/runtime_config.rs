use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::ViewConfig;
use crate::ext::AbsolutePathExt;

const DEFAULT_DEPTH: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Absolute path of the tree root.
    pub root: String,
    /// `None` when neither the command line nor the view config chose.
    pub hide_hidden: Option<bool>,
    pub depth: Option<usize>,
    /// Absolute paths of directories to expand regardless of depth.
    pub expand: Vec<String>,
    pub config_path: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Fills in what the command line left unset from the view config file.
    pub fn with_view_config(mut self, view_config: ViewConfig) -> Self {
        self.hide_hidden = self.hide_hidden.or(view_config.hide_hidden);
        self.depth = self.depth.or(view_config.depth);

        let root = PathBuf::from(&self.root);
        for target in view_config.expand {
            let resolved = resolve_against(&root, Path::new(&target));
            if !self.expand.contains(&resolved) {
                self.expand.push(resolved);
            }
        }
        self
    }

    pub fn hide_hidden(&self) -> bool {
        self.hide_hidden.unwrap_or(false)
    }

    pub fn depth(&self) -> usize {
        self.depth.unwrap_or(DEFAULT_DEPTH)
    }
}

fn resolve_against(root: &Path, target: &Path) -> String {
    root.join(target).to_absolute_string()
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let root = cli.root.to_absolute_string();
        let root_path = PathBuf::from(&root);
        let expand = cli
            .expand
            .iter()
            .map(|target| resolve_against(&root_path, target))
            .collect();

        Self {
            root,
            hide_hidden: match (cli.hide_hidden, cli.show_hidden) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            depth: cli.depth,
            expand,
            config_path: cli.config,
        }
    }
}
