//! Package alias metadata written by the code generator.
//!
//! After generation the scaffold plugin records, for every definition file,
//! the package it chose and the alias used to import it. Two definition files
//! may resolve to packages with the same name; the alias disambiguates them.
//!
//! # Example
//!
//! ```json
//! {
//!   "a.proto": { "Alias": "svc1", "GoPackage": "pkg1" }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Alias and resolved package chosen for one definition file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageAlias {
    /// Import alias used by the generated scaffold.
    #[serde(rename = "Alias")]
    pub alias: String,

    /// Package path relative to the output directory.
    #[serde(rename = "GoPackage")]
    pub package: String,
}

/// Mapping from definition file name to its [`PackageAlias`].
///
/// Keys keep the order in which they appear in the metadata file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct PackageAliasMap(IndexMap<String, PackageAlias>);

impl PackageAliasMap {
    pub fn new(entries: IndexMap<String, PackageAlias>) -> Self {
        Self(entries)
    }

    pub fn get(&self, file_name: &str) -> Option<&PackageAlias> {
        self.0.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PackageAlias)> {
        self.0.iter()
    }

    /// Location of the generated message source for `proto_path`.
    ///
    /// Aliased definitions live in their package directory below `output_dir`;
    /// anything else lands directly in `output_dir`.
    pub fn generated_source_path(&self, proto_path: &Path, output_dir: &Path) -> PathBuf {
        let file_name = proto_file_name(proto_path);
        let source_name = format!("{}.pb.go", proto_name(proto_path));
        match self.get(&file_name) {
            Some(alias) => output_dir.join(&alias.package).join(source_name),
            None => output_dir.join(source_name),
        }
    }
}

/// Last path segment of a definition path.
pub fn proto_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name of a definition path up to the first `.`.
pub fn proto_name(path: &Path) -> String {
    let file_name = proto_file_name(path);
    match file_name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => file_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackageAliasMap {
        let mut entries = IndexMap::new();
        entries.insert(
            "a.proto".to_string(),
            PackageAlias {
                alias: "svc1".to_string(),
                package: "pkg1".to_string(),
            },
        );
        PackageAliasMap::new(entries)
    }

    #[test]
    fn test_proto_names() {
        let path = Path::new("svc/nested/greeter.v1.proto");
        assert_eq!(proto_file_name(path), "greeter.v1.proto");
        assert_eq!(proto_name(path), "greeter");
        assert_eq!(proto_name(Path::new("plain")), "plain");
    }

    #[test]
    fn test_generated_source_path_aliased() {
        let map = sample();
        let path = map.generated_source_path(Path::new("svc/a.proto"), Path::new("/out/"));
        assert_eq!(path, PathBuf::from("/out/pkg1/a.pb.go"));
    }

    #[test]
    fn test_generated_source_path_unaliased() {
        let map = sample();
        let path = map.generated_source_path(Path::new("svc/b.proto"), Path::new("/out/"));
        assert_eq!(path, PathBuf::from("/out/b.pb.go"));
    }
}
