//! Source tree walking and path-to-module-name mapping.

use std::ffi::OsStr;
use std::path::{Component, Path};

use tracing::trace;
use walkdir::WalkDir;

use crate::config::SourceLayout;
use crate::error::{DiError, DiResult};

/// Module names for every source file under `root`.
///
/// Entries are visited in file-name order, so the result is stable across runs.
/// Only regular files with the layout's extension are considered.
pub fn source_names(root: &Path, layout: &SourceLayout) -> DiResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            DiError::Discovery(format!("cannot walk {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some(layout.extension.as_str()) {
            continue;
        }
        let name = module_name(path, layout)?;
        trace!(path = %path.display(), module = %name, "discovered source file");
        names.push(name);
    }
    Ok(names)
}

/// Maps one source file path onto its module name.
///
/// ```rust
/// use ferrous_ioc::catalog::discovery::module_name;
/// use ferrous_ioc::SourceLayout;
/// use std::path::Path;
///
/// let layout = SourceLayout::default();
/// assert_eq!(module_name(Path::new("src/app/engine.rs"), &layout).unwrap(), "app::engine");
/// assert_eq!(module_name(Path::new("/work/src/app/mod.rs"), &layout).unwrap(), "app");
/// assert!(module_name(Path::new("lib/app.rs"), &layout).is_err());
/// ```
pub fn module_name(path: &Path, layout: &SourceLayout) -> DiResult<String> {
    let components = normal_components(path);
    let root = normal_components(&layout.source_root);
    if root.is_empty() {
        return Err(DiError::Discovery(format!(
            "source root {} has no path components",
            layout.source_root.display()
        )));
    }

    // Last occurrence, so a checkout living under some other `src` still maps.
    let start = components
        .windows(root.len())
        .rposition(|window| window == root.as_slice())
        .map(|index| index + root.len())
        .ok_or_else(|| {
            DiError::Discovery(format!(
                "{} is outside source root {}",
                path.display(),
                layout.source_root.display()
            ))
        })?;

    let mut segments = Vec::with_capacity(components.len() - start);
    for component in &components[start..] {
        let segment = component.to_str().ok_or_else(|| {
            DiError::Discovery(format!("{} is not valid unicode", path.display()))
        })?;
        segments.push(segment);
    }

    if let Some(file) = segments.pop() {
        let stem = Path::new(file)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(file);
        if stem != "mod" {
            segments.push(stem);
        }
    }

    if segments.is_empty() {
        return Err(DiError::Discovery(format!(
            "{} does not name a module",
            path.display()
        )));
    }
    Ok(segments.join(&layout.namespace_separator))
}

fn normal_components(path: &Path) -> Vec<&OsStr> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn nested_paths_become_module_paths() {
        let layout = SourceLayout::default();
        assert_eq!(
            module_name(Path::new("src/cars/parts/engine.rs"), &layout).unwrap(),
            "cars::parts::engine"
        );
        assert_eq!(module_name(Path::new("./src/lib.rs"), &layout).unwrap(), "lib");
    }

    #[test]
    fn custom_layout_is_honoured() {
        let layout = SourceLayout {
            source_root: PathBuf::from("crates/core/src"),
            extension: "unit".to_string(),
            namespace_separator: ".".to_string(),
        };
        assert_eq!(
            module_name(Path::new("crates/core/src/acme/engine.unit"), &layout).unwrap(),
            "acme.engine"
        );
    }

    #[test]
    fn bare_mod_file_is_rejected() {
        let layout = SourceLayout::default();
        assert!(matches!(
            module_name(Path::new("src/mod.rs"), &layout),
            Err(DiError::Discovery(_))
        ));
    }

    #[test]
    fn walk_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/zeta.rs");
        touch(dir.path(), "src/alpha/mod.rs");
        touch(dir.path(), "src/alpha/beta.rs");
        touch(dir.path(), "src/notes.txt");

        let names = source_names(&dir.path().join("src"), &SourceLayout::default()).unwrap();
        assert_eq!(names, vec!["alpha::beta", "alpha", "zeta"]);
    }

    #[test]
    fn missing_root_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = source_names(&dir.path().join("src/nowhere"), &SourceLayout::default());
        assert!(matches!(result, Err(DiError::Discovery(_))));
    }
}
