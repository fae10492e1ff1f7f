//! Adapters Layer
//!
//! - `DirectorySource`: lists unpacked under a directory
//! - `ZipSource`: lists packed in a zip archive
//! - `RuleSetSource`: picks one of the above from a path

pub mod directory;
pub mod zip_archive;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use directory::DirectorySource;
pub use zip_archive::ZipSource;

use crate::error::RuleSetError;
use crate::ports::ListSource;

/// A rule-set location resolved from a filesystem path.
pub enum RuleSetSource {
    Directory(DirectorySource),
    Zip(ZipSource<BufReader<File>>),
}

impl RuleSetSource {
    /// Open `path` as a zip archive if it has a `.zip` extension, otherwise
    /// as a directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        let is_zip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("zip"))
            .unwrap_or(false);

        if is_zip {
            Ok(RuleSetSource::Zip(ZipSource::open(path)?))
        } else {
            Ok(RuleSetSource::Directory(DirectorySource::open(path)?))
        }
    }
}

impl ListSource for RuleSetSource {
    fn read_list(&mut self, path: &str) -> Result<Option<String>, RuleSetError> {
        match self {
            RuleSetSource::Directory(source) => source.read_list(path),
            RuleSetSource::Zip(source) => source.read_list(path),
        }
    }

    fn list_paths(&mut self) -> Result<Vec<String>, RuleSetError> {
        match self {
            RuleSetSource::Directory(source) => source.list_paths(),
            RuleSetSource::Zip(source) => source.list_paths(),
        }
    }
}
