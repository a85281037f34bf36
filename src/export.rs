use crate::analysis::PassengerSet;
use crate::report::{InteractiveChart, render_document};
use std::io;
use std::path::{Path, PathBuf};

/// File name of every exported interactive document.
pub const DOCUMENT_NAME: &str = "plotly_graph.html";

const DIR_PREFIX: &str = "titanic_viz_";

#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
    Viewer(io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "could not write chart: {e}"),
            ExportError::Viewer(e) => write!(f, "could not open viewer: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) | ExportError::Viewer(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Write `html` into a freshly created temporary directory.
///
/// The directory is created under `parent`, or the system temp directory when
/// `parent` is `None`, and is not removed afterwards.
pub fn write_document(parent: Option<&Path>, html: &str) -> io::Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(DIR_PREFIX);
    let dir = match parent {
        Some(p) => builder.tempdir_in(p)?,
        None => builder.tempdir()?,
    }
    .keep();
    let path = dir.join(DOCUMENT_NAME);
    std::fs::write(&path, html)?;
    Ok(path)
}

pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Build `chart` and write it as an HTML document.
pub fn export_chart(
    chart: InteractiveChart,
    set: &PassengerSet,
    parent: Option<&Path>,
) -> Result<PathBuf, ExportError> {
    let html = render_document(chart, set);
    let path = write_document(parent, &html)?;
    log::info!("Exported {} to {}", chart.key(), path.display());
    Ok(path)
}

pub fn open_in_viewer(path: &Path) -> Result<(), ExportError> {
    let url = file_url(path);
    log::info!("Opening {url}");
    open::that(&url).map_err(ExportError::Viewer)
}

/// Export `chart` to a new temporary document and open it in the browser.
pub fn show_chart(
    chart: InteractiveChart,
    set: &PassengerSet,
    exports: &mut ExportLog,
) -> Result<PathBuf, ExportError> {
    let path = export_chart(chart, set, None)?;
    exports.record(&path);
    open_in_viewer(&path)?;
    Ok(path)
}

/// Directories holding documents exported during this session.
#[derive(Debug, Default)]
pub struct ExportLog {
    dirs: Vec<PathBuf>,
}

impl ExportLog {
    pub fn record(&mut self, document: &Path) {
        if let Some(dir) = document.parent() {
            self.dirs.push(dir.to_path_buf());
        }
    }

    /// Remove every recorded directory, returning how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for dir in self.dirs.drain(..) {
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Could not remove {}: {e}", dir.display()),
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::sample_set;
    use crate::report::ALL_INTERACTIVE_CHARTS;

    fn count_files(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| std::fs::read_dir(e.unwrap().path()).unwrap().count())
            .sum()
    }

    #[test]
    fn each_export_creates_exactly_one_new_document() {
        let parent = tempfile::tempdir().unwrap();
        let set = sample_set();
        for (n, chart) in ALL_INTERACTIVE_CHARTS.into_iter().enumerate() {
            let path = export_chart(chart, &set, Some(parent.path())).unwrap();
            assert_eq!(path.file_name().unwrap(), DOCUMENT_NAME);
            assert_eq!(count_files(parent.path()), n + 1);

            let doc = std::fs::read_to_string(&path).unwrap();
            assert!(doc.contains(chart.title()));
        }
    }

    #[test]
    fn exported_document_works_offline() {
        let parent = tempfile::tempdir().unwrap();
        let path = export_chart(InteractiveChart::Pie, &sample_set(), Some(parent.path())).unwrap();
        let doc = std::fs::read_to_string(&path).unwrap();
        assert!(!doc.contains("cdn.plot.ly"));
        // plotly.min.js alone is several megabytes.
        assert!(doc.len() > 1_000_000, "document is {} bytes", doc.len());
        assert!(doc.contains("Plotly.newPlot"));
    }

    #[test]
    fn repeated_exports_never_reuse_a_directory() {
        let parent = tempfile::tempdir().unwrap();
        let set = sample_set();
        let a = export_chart(InteractiveChart::Pie, &set, Some(parent.path())).unwrap();
        let b = export_chart(InteractiveChart::Pie, &set, Some(parent.path())).unwrap();
        assert_ne!(a.parent(), b.parent());
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn file_url_uses_file_scheme() {
        let url = file_url(Path::new("/tmp/x/plotly_graph.html"));
        assert_eq!(url, "file:///tmp/x/plotly_graph.html");
    }

    #[test]
    fn export_log_cleanup_removes_directories() {
        let parent = tempfile::tempdir().unwrap();
        let mut exports = ExportLog::default();
        let path = write_document(Some(parent.path()), "<html></html>").unwrap();
        exports.record(&path);
        assert_eq!(exports.dirs.len(), 1);
        assert_eq!(exports.cleanup(), 1);
        assert!(!path.exists());
        assert!(exports.dirs.is_empty());
    }

    #[test]
    fn write_into_missing_parent_fails() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("nope");
        assert!(write_document(Some(&missing), "x").is_err());
    }
}
