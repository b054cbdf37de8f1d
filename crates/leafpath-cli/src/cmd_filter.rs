use crate::io::{read_file, write_output};
use anyhow::{Context, Result};
use leafpath::v1::filter;
use std::path::PathBuf;

pub fn run(
    input: PathBuf,
    paths: Option<PathBuf>,
    key: Option<String>,
    loose: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let lines = read_file(&input)?;
    let wanted = paths.as_deref().map(read_file).transpose()?;
    let kept = filter_content(&lines, wanted.as_deref(), key.as_deref(), loose)?;
    write_output(output.as_ref(), &kept)
}

fn filter_content(
    lines: &str,
    paths: Option<&str>,
    key: Option<&str>,
    loose: bool,
) -> Result<String> {
    let kept =
        filter::filter_lines(lines, paths, key, loose).context("Failed to read records")?;
    tracing::debug!(kept = kept.len(), ?key, loose, "filtered records");
    Ok(kept
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}
