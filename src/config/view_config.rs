use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::AbsolutePathExt;

const VIEW_CONFIG_FILE_NAME: &str = "lazyfs.yaml";

const HIDE_HIDDEN_KEY: &str = "hide_hidden";
const DEPTH_KEY: &str = "depth";
const EXPAND_KEY: &str = "expand";

fn get_view_config_path(root: &Path) -> PathBuf {
    root.join(VIEW_CONFIG_FILE_NAME)
}

/// Presentation settings that can be stored next to the browsed tree.
///
/// Every field is optional so command line flags can fill the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub hide_hidden: Option<bool>,
    pub depth: Option<usize>,
    pub expand: Vec<String>,
}

impl ViewConfig {
    /// Reads `lazyfs.yaml` from `root`, or the defaults if there is none.
    pub async fn read(root: &Path) -> Result<Self, ViewConfigError> {
        let path = get_view_config_path(root);
        match fs::read(&path).await {
            Ok(bytes) => Self::from_bytes(&path, bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No view config at {}, using defaults", path.to_absolute_string());
                Ok(Self::default())
            }
            Err(e) => Err(e).context(ReadSnafu {
                file_path: path.to_absolute_string(),
            }),
        }
    }

    /// Reads an explicitly requested config file; a missing file is an error.
    pub async fn from_path(path: PathBuf) -> Result<Self, ViewConfigError> {
        debug!("Opening view config file: {}", path.to_absolute_string());
        let bytes = fs::read(&path).await.context(ReadSnafu {
            file_path: path.to_absolute_string(),
        })?;
        Self::from_bytes(&path, bytes)
    }

    fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, ViewConfigError> {
        debug!("Read view config file: {} bytes", bytes.len());
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.to_absolute_string(),
        })?;
        contents.as_str().try_into()
    }

    fn parse_hide_hidden(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Option<bool>, ViewConfigError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(HIDE_HIDDEN_KEY)))) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
            Some(Yaml::Value(Scalar::Boolean(value))) => Ok(Some(*value)),
            Some(_) => InvalidValueSnafu {
                key: HIDE_HIDDEN_KEY,
            }
            .fail(),
        }
    }

    fn parse_depth(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Option<usize>, ViewConfigError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(DEPTH_KEY)))) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(None),
            Some(Yaml::Value(Scalar::Integer(value))) => usize::try_from(*value)
                .map(Some)
                .ok()
                .context(InvalidValueSnafu { key: DEPTH_KEY }),
            Some(_) => InvalidValueSnafu { key: DEPTH_KEY }.fail(),
        }
    }

    fn parse_expand(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Vec<String>, ViewConfigError> {
        match top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(EXPAND_KEY)))) {
            None | Some(Yaml::Value(Scalar::Null)) => Ok(Vec::new()),
            Some(Yaml::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(|s| s.to_string())
                        .context(InvalidValueSnafu { key: EXPAND_KEY })
                })
                .collect(),
            Some(_) => InvalidValueSnafu { key: EXPAND_KEY }.fail(),
        }
    }
}

impl TryFrom<&str> for ViewConfig {
    type Error = ViewConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(ViewConfigError::TopLevelNotMap)?;

        Ok(ViewConfig {
            hide_hidden: Self::parse_hide_hidden(top_level)?,
            depth: Self::parse_depth(top_level)?,
            expand: Self::parse_expand(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ViewConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Invalid value for '{}' in config", key))]
    InvalidValueError { key: String },
}
