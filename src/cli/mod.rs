pub mod doctor;
pub mod export;
pub mod generate;
pub mod parse;
pub mod validate;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Today in local time; every command that needs a week or quarter uses this.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
