use std::{fs, path::Path};

use crate::error::{IoResultExt as _, Result};

/// Mirror everything under `static_dir` into `out_dir`.
///
/// `static/css/a.css` lands at `<out_dir>/css/a.css`. Existing directories
/// are merged into and existing files overwritten. A missing `static_dir`
/// is not an error.
pub fn copy_static_dir_to(static_dir: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<()> {
    let static_dir = static_dir.as_ref();
    let out_dir = out_dir.as_ref();

    if !static_dir.is_dir() {
        log::debug!("no static dir at {}", static_dir.display());
        return Ok(());
    }

    for entry in fs::read_dir(static_dir).at(static_dir)? {
        let entry = entry.at(static_dir)?;
        let dst = out_dir.join(entry.file_name());

        log::info!("copy static: {}", entry.path().display());
        copy_entry(&entry.path(), &dst)?;
    }

    Ok(())
}

fn copy_entry(src: &Path, dst: &Path) -> Result<()> {
    // follows symlinks
    if src.is_dir() {
        copy_dir(src, dst)
    } else {
        fs::copy(src, dst).at(src)?;
        Ok(())
    }
}

fn copy_dir(src_dir: &Path, dst_dir: &Path) -> Result<()> {
    fs::create_dir_all(dst_dir).at(dst_dir)?;

    for entry in fs::read_dir(src_dir).at(src_dir)? {
        let entry = entry.at(src_dir)?;
        copy_entry(&entry.path(), &dst_dir.join(entry.file_name()))?;
    }

    Ok(())
}
