use std::path::PathBuf;

/// Errors that can occur while reading a catalog source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file is missing or could not be read.
    #[error("failed to read catalog: {0}")]
    IoError(#[from] std::io::Error),
    /// The catalog file is not valid TOML.
    #[error("failed to parse catalog: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Produces the raw `(key, value)` records a catalog is built from.
pub trait CatalogSource {
    /// Reads every record of the source. Values are unparsed
    /// `"Name|Disc|Track"` strings.
    fn read_records(&self) -> Result<Vec<(String, String)>, CatalogError>;

    /// Short description of where records come from, used in log lines.
    fn describe(&self) -> String;
}

/// A TOML file of top-level `"path/fragment.ogg" = "Name|Disc|Track"` pairs.
///
/// A record whose value is not a string is kept with the value's TOML text as
/// its display name instead of failing the whole file.
#[derive(Debug, Clone)]
pub struct TomlFileSource {
    path: PathBuf,
}

impl TomlFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for TomlFileSource {
    fn read_records(&self) -> Result<Vec<(String, String)>, CatalogError> {
        let contents = std::fs::read_to_string(&self.path)?;
        let table: toml::Table = toml::from_str(&contents)?;

        Ok(table
            .into_iter()
            .map(|(key, value)| match value {
                toml::Value::String(raw) => (key, raw),
                other => {
                    log::warn!("Catalog record {key:?} is not a string, using it as a name.");
                    (key, other.to_string())
                }
            })
            .collect())
    }

    fn describe(&self) -> String {
        format!("{:?}", self.path)
    }
}
