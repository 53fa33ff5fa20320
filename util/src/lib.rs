use std::path::Path;

#[derive(thiserror::Error, Debug)]
#[error("Filesystem path is not valid UTF-8")]
pub struct PathEncodingError;

pub type Hasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;
pub type HashMap<K, V> = std::collections::HashMap<K, V, Hasher>;

/// File name of `path` with its final extension removed, e.g. `Lagrangian_crude` for
/// `/settings/Lagrangian_crude.dat`.
pub fn file_stem(path: &Path) -> Result<&str, PathEncodingError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or(PathEncodingError)
}
