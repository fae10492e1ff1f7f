//! Rule-set packed in a zip container

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::result::ZipError;
use zip::ZipArchive;

use crate::domain::normalize_list_path;
use crate::error::RuleSetError;
use crate::ports::{decode_list, ListSource};

pub struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(RuleSetError::SourceNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| RuleSetError::io(path.display().to_string(), e))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self, RuleSetError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> ListSource for ZipSource<R> {
    fn read_list(&mut self, path: &str) -> Result<Option<String>, RuleSetError> {
        let name = normalize_list_path(path);
        let mut file = match self.archive.by_name(&name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| RuleSetError::io(name.clone(), e))?;
        Ok(Some(decode_list(&bytes)))
    }

    fn list_paths(&mut self) -> Result<Vec<String>, RuleSetError> {
        let mut paths: Vec<String> = self
            .archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(str::to_string)
            .collect();
        paths.sort();
        Ok(paths)
    }
}
