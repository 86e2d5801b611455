use std::path::{Path, PathBuf};

use groupstat_data::loader::SPREADSHEET_EXTENSIONS;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the `-v` log level.
const LOG_ENV: &str = "GROUPSTAT_LOG";

/// Installs the stderr log subscriber.
///
/// `GROUPSTAT_LOG` takes precedence; otherwise each `-v` raises the level
/// from `warn`.
pub(crate) fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Opens the native file dialog, filtered to spreadsheets.
pub(crate) fn pick_spreadsheet() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select a spreadsheet")
        .add_filter("Spreadsheets", SPREADSHEET_EXTENSIONS)
        .pick_file()
}

/// Parses a significance level strictly between 0 and 1.
pub(crate) fn parse_alpha(s: &str) -> Result<f64, String> {
    let alpha = s
        .parse::<f64>()
        .map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if alpha > 0.0 && alpha < 1.0 {
        Ok(alpha)
    } else {
        Err(format!("significance level must be between 0 and 1, got {alpha}"))
    }
}

/// Final path component for display, falling back to the whole path.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alpha() {
        assert_eq!(parse_alpha("0.05"), Ok(0.05));
        assert_eq!(parse_alpha("0.5"), Ok(0.5));
        assert!(parse_alpha("0").is_err());
        assert!(parse_alpha("1").is_err());
        assert!(parse_alpha("-0.1").is_err());
        assert!(parse_alpha("five").is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/data/study.xlsx")), "study.xlsx");
        assert_eq!(file_name(Path::new("study.ods")), "study.ods");
    }
}
