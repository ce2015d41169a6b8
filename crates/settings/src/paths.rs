use std::path::PathBuf;

use tracing::debug;

/// 指定資料夾的環境變數。 / Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MARKDOWNIZR_DATA_DIR";

const APP_DIR_NAME: &str = "markdownizr";

/// 決定資料夾：明確指定 → 環境變數 → 系統資料夾 → 目前目錄。 / Resolves the data directory.
///
/// Order: explicit override, then `MARKDOWNIZR_DATA_DIR`, then the platform
/// data directory, then `.markdownizr` under the current directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return absolutize(path);
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return absolutize(PathBuf::from(trimmed));
        }
    }
    let dir = dirs::data_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .unwrap_or_else(|| absolutize(PathBuf::from(format!(".{APP_DIR_NAME}"))));
    debug!("Using data directory {}", dir.display());
    dir
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = std::env::temp_dir().join("markdownizr-explicit");
        assert_eq!(resolve_data_dir(Some(dir.clone())), dir);
    }

    #[test]
    fn relative_override_is_made_absolute() {
        let resolved = resolve_data_dir(Some(PathBuf::from("relative-data")));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative-data"));
    }
}
