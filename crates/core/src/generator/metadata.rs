//! Loading of the package alias metadata file.

use super::error::{GenerateError, GenerateResult};
use pm_protocol::metadata_models::PackageAliasMap;
use std::path::Path;

/// Reads and validates the package alias metadata at `path`.
///
/// The file must be a JSON object keyed by definition file name, each value
/// an object with exactly the `Alias` and `GoPackage` string fields. An
/// unreadable file and a badly shaped one are reported as distinct errors.
pub fn load_alias_map(path: &Path) -> GenerateResult<PackageAliasMap> {
    let content = std::fs::read_to_string(path).map_err(|source| GenerateError::MetadataMissing {
        path: path.to_path_buf(),
        source,
    })?;

    let map: PackageAliasMap =
        serde_json::from_str(&content).map_err(|e| GenerateError::MetadataMalformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if let Some((file, _)) = map.iter().find(|(file, _)| file.is_empty()) {
        return Err(GenerateError::MetadataMalformed {
            path: path.to_path_buf(),
            reason: format!("empty definition file name {file:?}"),
        });
    }

    Ok(map)
}
