use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Repository hosting the seaborn example datasets.
pub const DATA_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master";

/// Columns a dataset must provide for preparation to work.
pub const REQUIRED_COLUMNS: [&str; 3] = ["age", "fare", "class"];

/// One passenger row as stored in the CSV file.
#[derive(Debug, Deserialize, Clone, Serialize, Default, PartialEq)]
pub struct RawPassenger {
    pub survived: u8,
    pub pclass: u8,
    pub sex: String,
    pub age: Option<f64>,
    pub sibsp: u32,
    pub parch: u32,
    pub fare: Option<f64>,
    pub embarked: Option<String>,
    pub class: String,
    pub who: Option<String>,
    pub deck: Option<String>,
    pub embark_town: Option<String>,
    pub alive: Option<String>,
}

#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Http { status: u16, body: String },
    Transport(Box<dyn std::error::Error + Send + Sync>),
    Csv(csv::Error),
    MissingColumn(&'static str),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(e) => write!(f, "I/O error: {e}"),
            DatasetError::Http { status, body } => write!(f, "HTTP {status}: {body}"),
            DatasetError::Transport(e) => write!(f, "Download failed: {e}"),
            DatasetError::Csv(e) => write!(f, "Malformed dataset: {e}"),
            DatasetError::MissingColumn(c) => write!(f, "Dataset has no `{c}` column"),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            DatasetError::Transport(e) => Some(&**e),
            DatasetError::Csv(e) => Some(e),
            DatasetError::Http { .. } | DatasetError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Io(e)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Csv(e)
    }
}

/// Where [`load_dataset`] looks for data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    /// Local CSV file that bypasses the cache and the download.
    pub file: Option<PathBuf>,
    /// Base URL the `<name>.csv` file is fetched from.
    pub base_url: String,
    /// Directory downloaded datasets are cached in.
    pub cache_dir: Option<PathBuf>,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            file: None,
            base_url: DATA_URL.to_string(),
            cache_dir: default_cache_dir(),
        }
    }
}

/// Determine the local dataset file to use, if any.
///
/// If the `TITANIC_DATA_FILE` environment variable is set, its value takes
/// precedence over the file configured in the application settings.
pub fn resolve_data_file(settings_file: Option<&str>) -> Option<PathBuf> {
    std::env::var_os("TITANIC_DATA_FILE")
        .map(PathBuf::from)
        .or_else(|| settings_file.map(PathBuf::from))
}

/// Cache directory shared with seaborn: `$SEABORN_DATA` or `~/seaborn-data`.
pub fn default_cache_dir() -> Option<PathBuf> {
    std::env::var_os("SEABORN_DATA")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|h| h.join("seaborn-data")))
}

/// Parse passenger rows from CSV data.
///
/// The header must contain every column in [`REQUIRED_COLUMNS`]. Unknown
/// columns are ignored and empty fields become `None`. A malformed row aborts
/// parsing.
pub fn parse_passengers<R: Read>(reader: R) -> Result<Vec<RawPassenger>, DatasetError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DatasetError::MissingColumn(col));
        }
    }
    let mut rows = Vec::new();
    for result in rdr.deserialize::<RawPassenger>() {
        rows.push(result?);
    }
    Ok(rows)
}

fn fetch_csv(url: &str) -> Result<String, DatasetError> {
    log::info!("Downloading dataset from {url}");
    match ureq::get(url).call() {
        Ok(r) => r
            .into_string()
            .map_err(|e| DatasetError::Transport(Box::new(e))),
        Err(ureq::Error::Status(status, r)) => {
            let body = r.into_string().unwrap_or_default();
            Err(DatasetError::Http { status, body })
        }
        Err(e) => Err(DatasetError::Transport(Box::new(e))),
    }
}

fn read_file(path: &Path) -> Result<Vec<RawPassenger>, DatasetError> {
    let rows = parse_passengers(File::open(path)?)?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load the named dataset.
///
/// A configured local file wins. Otherwise a cached copy is used when present
/// and the dataset is downloaded and cached when it is not. Failing to write
/// the cache is logged but does not fail the load.
pub fn load_dataset(name: &str, source: &DataSource) -> Result<Vec<RawPassenger>, DatasetError> {
    if let Some(ref file) = source.file {
        return read_file(file);
    }

    let file_name = format!("{name}.csv");
    let cached = source.cache_dir.as_ref().map(|d| d.join(&file_name));
    if let Some(ref path) = cached {
        if path.exists() {
            return read_file(path);
        }
    }

    let url = format!("{}/{}", source.base_url.trim_end_matches('/'), file_name);
    let text = fetch_csv(&url)?;
    if let Some(ref path) = cached {
        let written = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| std::fs::write(path, &text));
        if let Err(e) = written {
            log::warn!("Could not cache dataset at {}: {e}", path.display());
        }
    }
    let rows = parse_passengers(text.as_bytes())?;
    log::info!("Loaded {} rows from {url}", rows.len());
    Ok(rows)
}
