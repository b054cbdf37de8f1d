use crate::io::read_file;
use anyhow::Result;
use leafpath::v1::{IndexingPolicy, parse, traverse};
use std::path::PathBuf;

pub fn run(input: PathBuf) -> Result<()> {
    let content = read_file(&input)?;
    println!("{}", validate_content(&content)?);
    Ok(())
}

fn validate_content(content: &str) -> Result<String> {
    match parse(content) {
        Ok(doc) => {
            let summary = match &doc.root {
                Some(root) => {
                    let leaves = traverse::flatten_iterative(&doc, &IndexingPolicy::default());
                    format!("Valid: <{}> ({} leaves)", root.tag, leaves.len())
                }
                None => "Valid: empty document".to_string(),
            };
            Ok(summary)
        }
        Err(e) => Err(anyhow::anyhow!("Invalid: {}", e)),
    }
}
