//! Lexical path cleaning and destination containment.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes `path`: drops `.`, resolves `..` against preceding
/// components. `..` directly under the root stays at the root; leading `..`
/// of a relative path is kept. Does not touch the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(c),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Where archive entry `name` lands under `dest`, or `None` if it would not
/// be strictly inside `dest`.
///
/// Backslashes are read as separators so Windows-authored names such as
/// `..\..\x` are caught too. Absolute names are never inside.
pub fn contained_path(dest: &Path, name: &str) -> Option<PathBuf> {
    let name = name.replace('\\', "/");
    let root = clean(dest);
    let candidate = clean(&dest.join(name));
    (candidate != root && candidate.starts_with(&root)).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_resolves_dots() {
        assert_eq!(clean(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(clean(Path::new("a/../../b")), PathBuf::from("../b"));
        assert_eq!(clean(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn nested_entries_are_inside() {
        let dest = Path::new("/builds/5.3.0");
        assert_eq!(
            contained_path(dest, "Engine/Binaries/Win64/UnrealEditor.exe"),
            Some(PathBuf::from("/builds/5.3.0/Engine/Binaries/Win64/UnrealEditor.exe"))
        );
        assert_eq!(
            contained_path(dest, "Engine/./Config/../Build/x.txt"),
            Some(PathBuf::from("/builds/5.3.0/Engine/Build/x.txt"))
        );
        assert_eq!(
            contained_path(dest, "Engine\\Binaries\\a.dll"),
            Some(PathBuf::from("/builds/5.3.0/Engine/Binaries/a.dll"))
        );
    }

    #[test]
    fn traversal_rejected() {
        let dest = Path::new("/builds/5.3.0");
        assert_eq!(contained_path(dest, "../evil.txt"), None);
        assert_eq!(contained_path(dest, "Engine/../../evil.txt"), None);
        assert_eq!(contained_path(dest, "..\\..\\evil.txt"), None);
        assert_eq!(contained_path(dest, "/etc/passwd"), None);
    }

    #[test]
    fn sibling_with_shared_prefix_rejected() {
        // "5.3.0-evil" shares a string prefix with "5.3.0" but is a sibling.
        let dest = Path::new("builds/5.3.0");
        assert_eq!(contained_path(dest, "../5.3.0-evil/x"), None);
    }

    #[test]
    fn destination_itself_rejected() {
        let dest = Path::new("/builds/5.3.0");
        assert_eq!(contained_path(dest, "."), None);
        assert_eq!(contained_path(dest, "Engine/.."), None);
    }
}
