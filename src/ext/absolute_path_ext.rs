use std::path::{Component, Path, PathBuf};

/// Resolves `path` to an absolute string suitable as a tree root.
///
/// Symbolic links are resolved when the path exists; otherwise the path is
/// made absolute against the current directory and `.`/`..` are folded
/// lexically.
pub fn absolute_path_string(path: &Path) -> String {
    if let Ok(canonical) = path.canonicalize() {
        return canonical.to_string_lossy().to_string();
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|current_dir| current_dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    fold_components(&absolute).to_string_lossy().to_string()
}

fn fold_components(path: &Path) -> PathBuf {
    let mut folded: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.last(), Some(Component::Normal(_))) {
                    folded.pop();
                }
            }
            other => folded.push(other),
        }
    }

    folded.iter().collect()
}

pub trait AbsolutePathExt {
    fn to_absolute_string(&self) -> String;
}

impl AbsolutePathExt for Path {
    fn to_absolute_string(&self) -> String {
        absolute_path_string(self)
    }
}

impl AbsolutePathExt for PathBuf {
    fn to_absolute_string(&self) -> String {
        absolute_path_string(self)
    }
}
