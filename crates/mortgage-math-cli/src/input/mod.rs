pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a calculator input from `--input`, or from piped stdin when no file
/// was given. Returns `None` when neither source is available so the caller
/// can fall back to individual flags.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
