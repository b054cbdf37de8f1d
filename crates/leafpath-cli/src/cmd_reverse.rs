use crate::io::{read_input, write_output};
use anyhow::{Context, Result};
use leafpath::v1::reverse;
use std::path::PathBuf;

pub fn run(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    nested: bool,
    pretty: bool,
) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let json = reverse_content(&content, nested, pretty)?;
    write_output(output.as_ref(), &json)
}

fn reverse_content(content: &str, nested: bool, pretty: bool) -> Result<String> {
    let records = reverse::records_from_str(content).context("Failed to read records")?;
    tracing::debug!(records = records.len(), nested, "reversing records");

    let value = if nested {
        reverse::nest(&records)?
    } else {
        serde_json::to_value(&records)?
    };

    let json = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LINES: &str = "widget : /shop/item/name\ngadget : /shop/item[2]/name\n";

    #[test]
    fn test_reverse_flat() {
        let json = reverse_content(LINES, false, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["key"], "name");
        assert_eq!(value[1]["path"], "/shop/item[2]/name");
        assert_eq!(value[1]["segments"][1], "item");
    }

    #[test]
    fn test_reverse_nested() {
        let json = reverse_content(LINES, true, false).unwrap();
        assert_eq!(
            json,
            r#"{"shop":{"item":[{"name":"widget"},{"name":"gadget"}]}}"#
        );
    }

    #[test]
    fn test_reverse_pretty() {
        let json = reverse_content(LINES, true, true).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_reverse_malformed() {
        assert!(reverse_content("not a record", false, false).is_err());
    }

    #[test]
    fn test_run_with_files() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{}", LINES).unwrap();
        f.flush().unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();
        run(
            Some(f.path().to_path_buf()),
            Some(out.path().to_path_buf()),
            false,
            false,
        )
        .unwrap();
        let content = std::fs::read_to_string(out.path()).unwrap();
        assert!(content.contains("\"gadget\""));
    }
}
