//! Rule-set unpacked in a directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::domain::normalize_list_path;
use crate::error::RuleSetError;
use crate::ports::{decode_list, ListSource};

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RuleSetError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RuleSetError::SourceNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, RuleSetError> {
        let relative = PathBuf::from(normalize_list_path(path));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(RuleSetError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> Result<(), RuleSetError> {
    let entries = fs::read_dir(dir).map_err(|e| RuleSetError::io(dir.display().to_string(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| RuleSetError::io(dir.display().to_string(), e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, &path, out)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
    Ok(())
}

impl ListSource for DirectorySource {
    fn read_list(&mut self, path: &str) -> Result<Option<String>, RuleSetError> {
        let full = self.resolve(path)?;
        match fs::read(&full) {
            Ok(bytes) => Ok(Some(decode_list(&bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RuleSetError::io(full.display().to_string(), e)),
        }
    }

    fn list_paths(&mut self) -> Result<Vec<String>, RuleSetError> {
        let mut paths = Vec::new();
        collect_files(&self.root, &self.root, &mut paths)?;
        paths.sort();
        Ok(paths)
    }
}
