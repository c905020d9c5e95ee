use std::path::{Component, Path, PathBuf};
use std::str;

#[derive(Debug, PartialEq)]
/// One parsed `GET <filename>` request; lives for a single connection.
pub struct Request {
    pub filename: String,
}

impl Request {
    /// Parses the single request read.
    ///
    /// The verb and the filename are the first two whitespace-split tokens;
    /// anything after them is ignored. An empty read, a missing filename, a
    /// wrong verb or non-UTF-8 bytes all parse to `None`.
    pub fn parse(raw: &[u8]) -> Option<Request> {
        let text = str::from_utf8(raw).ok()?;
        let mut tokens = text.split_whitespace();
        if tokens.next()? != "GET" {
            return None;
        }
        let filename = tokens.next()?;
        Some(Request {
            filename: filename.to_string(),
        })
    }

    /// Resolves the requested name under `share_root`.
    ///
    /// Names that could escape the root resolve to `None`; the caller treats
    /// them the same as a missing file.
    pub fn resolve(&self, share_root: &Path) -> Option<PathBuf> {
        if !is_safe_name(&self.filename) {
            return None;
        }
        Some(share_root.join(&self.filename))
    }
}

/// A safe name is a single normal path component: no separators, no parent
/// or current-directory segments, no root prefix. Backslashes are refused
/// outright so a name crafted on one platform cannot escape on another.
pub fn is_safe_name(name: &str) -> bool {
    if name.contains('\\') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
