use std::io::Write;
use std::path::Path;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::{RenderError, RuntimeConfig, TreeRenderer};
use crate::cli::Cli;
use crate::config::{ViewConfig, ViewConfigError};
use crate::filesystem::NativeFileSystem;
use crate::tree::{LazyTreeModel, ModelError};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let runtime_config: RuntimeConfig = cli.into();

        let view_config = match runtime_config.config_path.clone() {
            Some(path) => ViewConfig::from_path(path).await,
            None => ViewConfig::read(Path::new(&runtime_config.root)).await,
        }
        .context(ViewConfigSnafu)?;
        debug!("Loaded view config: {:?}", view_config);

        let runtime_config = runtime_config.with_view_config(view_config);
        debug!("Runtime config: {:?}", runtime_config);

        let mut model = LazyTreeModel::new(NativeFileSystem::new());
        model.set_hide_hidden(runtime_config.hide_hidden());
        let root = model
            .initialize_root(runtime_config.root.clone())
            .context(RootSnafu {
                root: runtime_config.root.clone(),
            })?;
        info!("Browsing {}", model.root_path());

        let colored = supports_color::on(Stream::Stdout).is_some();
        let mut stdout = std::io::stdout().lock();
        TreeRenderer::new(&runtime_config, colored)
            .render(&mut model, &root, &mut stdout)
            .context(RenderSnafu)?;
        stdout.flush().context(FlushSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the view config"))]
    ViewConfigError { source: ViewConfigError },
    #[snafu(display("Could not open {} as the tree root", root))]
    RootError { root: String, source: ModelError },
    #[snafu(display("Critical failure encountered while rendering the tree"))]
    RenderError { source: RenderError },
    #[snafu(display("Failed to flush the output"))]
    FlushError { source: std::io::Error },
}
