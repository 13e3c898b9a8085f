//! Path-shape helpers for package-manager install layouts.

use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;

/// Package-manager dependency directory.
pub const NODE_MODULES: &str = "node_modules";
/// Directory holding generated executable shims.
pub const BIN_SHIM_DIR: &str = ".bin";
/// pnpm's content-addressable virtual store directory.
pub const PNPM_STORE_DIR: &str = ".pnpm";
/// Directory holding built output inside a package.
pub const DIST_DIR: &str = "dist";
/// Built entry files, in preference order.
pub const BUILT_ENTRY_FILES: [&str; 2] = ["entry.js", "index.js"];

const BUILT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// Returns true if the path is non-empty and absolute.
pub fn is_nonempty_absolute(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute()
}

/// True when any component of `path` is a `node_modules` directory.
pub fn is_inside_node_modules(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == NODE_MODULES)
}

/// Locate `.../node_modules/<name>` for a path shaped like
/// `.../node_modules/.bin/<name>` or `.../node_modules/<name>/...`.
///
/// The last `node_modules` component wins so nested store layouts map to the
/// innermost package. Scoped packages (`@scope/<name>`) keep both segments.
pub fn package_root(path: &Path) -> Option<PathBuf> {
    let components: Vec<Component<'_>> = path.components().collect();
    let index = components
        .iter()
        .rposition(|component| component.as_os_str() == NODE_MODULES)?;
    let next = components.get(index + 1)?.as_os_str();

    if next == BIN_SHIM_DIR {
        // Only the shim itself maps to a package, not arbitrary `.bin` contents.
        if components.len() != index + 3 {
            return None;
        }
        let name = components[index + 2].as_os_str();
        return Some(collect_prefix(&components, index).join(name));
    }

    if is_scope_segment(next) {
        components.get(index + 2)?;
        return Some(collect_prefix(&components, index + 2));
    }

    Some(collect_prefix(&components, index + 1))
}

/// `<root>/dist/entry.js` and `<root>/dist/index.js`, in preference order.
pub fn built_entry_paths(root: &Path) -> Vec<PathBuf> {
    BUILT_ENTRY_FILES
        .iter()
        .map(|file| root.join(DIST_DIR).join(file))
        .collect()
}

/// True for `.../dist/<...>.{js,mjs,cjs}`.
pub fn is_built_output(path: &Path) -> bool {
    let has_built_extension = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| BUILT_EXTENSIONS.contains(&ext));
    if !has_built_extension {
        return false;
    }

    let parent = match path.parent() {
        Some(parent) => parent,
        None => return false,
    };
    parent
        .components()
        .any(|component| component.as_os_str() == DIST_DIR)
}

/// True when a component names an exact package version, e.g.
/// `openclaw@2026.1.5_3f9a` or `@openclaw+core@1.0.0`.
pub fn has_version_pinned_segment(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(segment) => segment
            .to_str()
            .zip(version_segment_pattern())
            .is_some_and(|(segment, pattern)| pattern.is_match(segment)),
        _ => false,
    })
}

/// Map a pnpm virtual-store path to the hoisted path that symlinks into it:
/// `<x>/node_modules/.pnpm/<entry>/node_modules/<pkg>/<rest>` becomes
/// `<x>/node_modules/<pkg>/<rest>`.
pub fn hoisted_equivalent(path: &Path) -> Option<PathBuf> {
    let components: Vec<Component<'_>> = path.components().collect();
    let store = components.iter().position(|component| {
        component.as_os_str() == PNPM_STORE_DIR
    })?;
    if store == 0 || components[store - 1].as_os_str() != NODE_MODULES {
        return None;
    }
    if components.get(store + 2)?.as_os_str() != NODE_MODULES {
        return None;
    }
    components.get(store + 3)?;

    let mut hoisted = collect_prefix(&components, store - 1);
    for component in &components[store + 3..] {
        hoisted.push(component);
    }
    Some(hoisted)
}

fn collect_prefix(components: &[Component<'_>], last: usize) -> PathBuf {
    components[..=last].iter().collect()
}

fn is_scope_segment(segment: &OsStr) -> bool {
    segment
        .to_str()
        .is_some_and(|segment| segment.starts_with('@') && segment.len() > 1)
}

fn version_segment_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(?:@[^@/]+\+)?[^@/]+@v?\d+\.\d+\.\d+").ok())
        .as_ref()
}
