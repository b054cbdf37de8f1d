use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Read a file, or stdin when no path (or `-`) is given.
pub fn read_input(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => read_file(path),
        _ => {
            use std::io::Read;
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
}

/// Write `content` plus a trailing newline to a file, or to stdout.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    let mut text = content.to_string();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }

    if let Some(path) = output {
        std::fs::write(path, &text).with_context(|| format!("Failed to write {:?}", path))?;
    } else {
        print!("{}", text);
    }
    Ok(())
}
