//! Small file plumbing helpers.

use crate::error::Result;
use std::io::{IsTerminal, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Final component of a path, when it is valid UTF-8.
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Writes the bytes to a named temp file. The file is removed when the
/// returned handle drops.
pub fn spill_to_temp(contents: &[u8]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}

/// Reads data piped into stdin. `None` when stdin is a terminal.
pub fn read_piped_input() -> Result<Option<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    stdin.lock().read_to_string(&mut input)?;
    Ok(Some(input))
}
