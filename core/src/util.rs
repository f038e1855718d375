use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};

/// Paths in the config file are relative to the directory it lives in.
pub fn absolute_or_relative_to(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}
