use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use peershare_config::{DOWNLOADS_DIR, SHARED_DIR};

#[derive(Debug, Clone)]
/// The two flat directories a peer works out of.
pub struct PeerDirs {
    pub share_root: PathBuf,
    pub download_root: PathBuf,
}

impl PeerDirs {
    /// Places `shared/` and `downloads/` under `base`.
    pub fn under(base: &Path) -> Self {
        PeerDirs {
            share_root: base.join(SHARED_DIR),
            download_root: base.join(DOWNLOADS_DIR),
        }
    }

    /// Creates both directories if absent.
    pub fn bootstrap(&self) -> io::Result<()> {
        fs::create_dir_all(&self.share_root)?;
        fs::create_dir_all(&self.download_root)
    }
}

/// Sorted bare names of the regular files currently offered to peers. The
/// directory listing is the only catalog there is.
pub fn list_shared(share_root: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(share_root)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Copies `path` into `share_root` under its basename. Returns the shared
/// name, or `None` when a file of that name is already offered.
pub fn add_to_shared(path: &Path, share_root: &Path) -> io::Result<Option<String>> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))?
        .to_string_lossy()
        .into_owned();
    let dest = share_root.join(&name);
    if dest.exists() {
        return Ok(None);
    }
    fs::copy(path, &dest)?;
    Ok(Some(name))
}
