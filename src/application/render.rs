use std::io::Write;

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::application::RuntimeConfig;
use crate::filesystem::FileSystemProvider;
use crate::tree::{Column, Decoration, LOADING_TEXT, LazyTreeModel, ModelError, NodeHandle};

const INDENT: &str = "  ";

/// Prints a model as an indented table, expanding directories on the way.
///
/// Only the model's positional API is used, the same way an interactive view
/// would drive it.
pub struct TreeRenderer {
    depth: usize,
    expand: Vec<String>,
    colored: bool,
}

impl TreeRenderer {
    pub fn new(config: &RuntimeConfig, colored: bool) -> Self {
        Self {
            depth: config.depth(),
            expand: config.expand.clone(),
            colored,
        }
    }

    pub fn render<P: FileSystemProvider>(
        &self,
        model: &mut LazyTreeModel<P>,
        root: &NodeHandle,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        self.write_header(model, out)?;
        self.render_level(model, root, 0, out)
    }

    fn write_header<P: FileSystemProvider>(
        &self,
        model: &LazyTreeModel<P>,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let header = |column: Column| model.header_data(column as usize).unwrap_or_default();
        writeln!(
            out,
            "{:<9}  {:>10}  {:<19}  {}",
            header(Column::Type),
            header(Column::Size),
            header(Column::LastModified),
            header(Column::Name)
        )
        .context(WriteSnafu)
    }

    fn render_level<P: FileSystemProvider>(
        &self,
        model: &mut LazyTreeModel<P>,
        parent: &NodeHandle,
        level: usize,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let rows = model.row_count(parent).context(ModelSnafu)?;

        for row in 0..rows {
            let handle = model.index(row, 0, parent).context(ModelSnafu)?;
            let path = model.path_of(&handle).context(ModelSnafu)?.to_string();
            if path.is_empty() {
                continue;
            }

            let expandable = model.can_expand(&handle).context(ModelSnafu)?;
            if expandable && self.wants_expanded(model, &path, level) {
                debug!("Expanding {} for display", path);
                if let Err(e) = model.expand(&handle) {
                    warn!("Could not expand {}: {}", path, e);
                }
            }

            self.write_row(model, &handle, level, out)?;

            if !model.can_expand(&handle).context(ModelSnafu)? {
                self.render_level(model, &handle, level + 1, out)?;
            }
        }

        Ok(())
    }

    fn wants_expanded<P: FileSystemProvider>(
        &self,
        model: &LazyTreeModel<P>,
        path: &str,
        level: usize,
    ) -> bool {
        if level < self.depth {
            return true;
        }

        let separator = model.provider().path_separator();
        let prefix = format!("{}{}", path.trim_end_matches(separator), separator);
        self.expand
            .iter()
            .any(|target| target == path || target.starts_with(&prefix))
    }

    fn write_row<P: FileSystemProvider>(
        &self,
        model: &LazyTreeModel<P>,
        handle: &NodeHandle,
        level: usize,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let text = |column: Column| -> Result<String, RenderError> {
            Ok(model
                .display_value(&handle.with_column(column as usize))
                .context(ModelSnafu)?
                .unwrap_or_default())
        };

        let name = text(Column::Name)?;
        let size = text(Column::Size)?;
        let decoration = model.decoration(handle).context(ModelSnafu)?;

        let name = match (self.colored, decoration) {
            (true, Some(Decoration::Folder)) => name.blue().bold().to_string(),
            _ => name,
        };
        let size = if self.colored && size == LOADING_TEXT {
            format!("{:>10}", size).dimmed().to_string()
        } else {
            format!("{:>10}", size)
        };

        writeln!(
            out,
            "{:<9}  {}  {:<19}  {}{}",
            text(Column::Type)?,
            size,
            text(Column::LastModified)?,
            INDENT.repeat(level),
            name
        )
        .context(WriteSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum RenderError {
    #[snafu(display("Failed to query the tree model"))]
    ModelError { source: ModelError },
    #[snafu(display("Failed to write the tree"))]
    WriteError { source: std::io::Error },
}
