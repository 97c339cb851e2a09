use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Browse a directory tree, reading each directory only when it is expanded.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Directory to use as the root of the tree
    #[clap(default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Leave out entries whose name starts with a dot
    #[clap(long, conflicts_with = "show_hidden")]
    pub hide_hidden: bool,

    /// List entries whose name starts with a dot, even if the view config hides them
    #[clap(long)]
    pub show_hidden: bool,

    /// Number of directory levels below the root to expand [default: 1]
    #[clap(long, short)]
    pub depth: Option<usize>,

    /// Directory to expand in addition to the depth limit, relative to the root
    #[clap(long, short)]
    pub expand: Vec<PathBuf>,

    /// View configuration file, defaults to lazyfs.yaml inside the root
    #[clap(long, short)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lazyfs"]).expect("Failed to parse arguments");

        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.hide_hidden);
        assert!(!cli.show_hidden);
        assert_eq!(cli.depth, None);
        assert!(cli.expand.is_empty());
        assert!(cli.config.is_none());
        assert!(matches!(cli.log_level, LogLevel::Warn));
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "lazyfs",
            "/srv",
            "--hide-hidden",
            "-d",
            "3",
            "-e",
            "www",
            "--expand",
            "/srv/logs",
            "--config",
            "view.yaml",
            "-l",
            "debug",
        ])
        .expect("Failed to parse arguments");

        assert_eq!(cli.root, PathBuf::from("/srv"));
        assert!(cli.hide_hidden);
        assert_eq!(cli.depth, Some(3));
        assert_eq!(
            cli.expand,
            vec![PathBuf::from("www"), PathBuf::from("/srv/logs")]
        );
        assert_eq!(cli.config, Some(PathBuf::from("view.yaml")));
        assert!(matches!(cli.log_level, LogLevel::Debug));
    }

    #[test]
    fn test_hidden_flags_conflict() {
        let result = Cli::try_parse_from(["lazyfs", "--hide-hidden", "--show-hidden"]);
        assert!(result.is_err());
    }
}
