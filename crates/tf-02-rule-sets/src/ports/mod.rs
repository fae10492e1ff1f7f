//! Ports Layer
//!
//! - `ListSource`: Driven port, where list files are read from

use crate::error::RuleSetError;

/// Read access to the files of one rule-set (Driven Port)
pub trait ListSource {
    /// Contents of the list at `path` (relative, `/`-separated), or `None`
    /// if the rule-set has no such file.
    fn read_list(&mut self, path: &str) -> Result<Option<String>, RuleSetError>;

    /// Relative paths of every file in the rule-set.
    fn list_paths(&mut self) -> Result<Vec<String>, RuleSetError>;
}

/// Decode list bytes, dropping a UTF-8 byte order mark.
pub(crate) fn decode_list(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
