//! Writing generated tables

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write a raw byte table to a file.
///
/// Parent directories are created when missing. The file is replaced
/// entirely; no header is added.
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(io::Error)` on failure
pub fn write_binary_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()
}

/// Temporary name a table is written under before it is moved into place.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Write text lines, each terminated by a newline.
pub fn write_text<W, I, S>(out: &mut W, lines: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    out.flush()
}
