use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use crate::core::config::app_config;
use crate::errors::UsageError;

/// Root directory for everything the service writes.
pub fn data_root_path() -> PathBuf {
    app_config().data_dir.clone()
}

/// `data/series/`
pub fn series_dir_path() -> PathBuf {
    data_root_path().join("series")
}

/// Resolves a caller-supplied series name under `base`.
/// Names must be relative and may not climb out of `base`.
pub fn series_file_path_in(base: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UsageError::InvalidSeriesName(name.to_string()).into());
    }

    let rel = Path::new(name);
    let escapes = rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(UsageError::InvalidSeriesName(name.to_string()).into());
    }

    Ok(base.join(rel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_names_resolve_under_base() {
        let p = series_file_path_in(Path::new("/srv/data/series"), "acct-a/running.series").unwrap();
        assert_eq!(p, PathBuf::from("/srv/data/series/acct-a/running.series"));
    }

    #[test]
    fn escaping_names_are_rejected() {
        let base = Path::new("/srv/data/series");
        assert!(series_file_path_in(base, "../etc/passwd").is_err());
        assert!(series_file_path_in(base, "/etc/passwd").is_err());
        assert!(series_file_path_in(base, "a/../../b").is_err());
        assert!(series_file_path_in(base, "  ").is_err());

        let err = series_file_path_in(base, "../x").unwrap_err();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::InvalidSeriesName("../x".into()))
        );
    }
}
