use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use zip::ZipArchive;

/// Unpack every entry of `archive_path` into `dest_dir`. Returns the number
/// of files written. Entries that escape the destination are skipped.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<usize> {
    if !archive_path.exists() {
        return Err(anyhow!("archive not found: {}", archive_path.display()));
    }
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("create {}", dest_dir.display()))?;

    let file = File::open(archive_path)
        .with_context(|| format!("open {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("read zip {}", archive_path.display()))?;

    let mut written = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).context("read zip entry")?;
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let target = dest_dir.join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("create {}", target.display()))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let mut out =
            File::create(&target).with_context(|| format!("create {}", target.display()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("unpack {}", target.display()))?;
        written += 1;
    }
    Ok(written)
}
