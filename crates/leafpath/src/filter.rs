//! Set-membership filters over reversed records.

use crate::error::Result;
use crate::reverse::{Record, SEPARATOR, records_from_str, strip_qualifiers};
use std::collections::HashSet;

/// Records whose path is exactly one of `paths`.
///
/// # Examples
///
/// ```
/// use leafpath::v1::{filter, reverse};
/// use std::collections::HashSet;
///
/// let records = reverse::records_from_str("a : /r/x\nb : /r/x[2]\nc : /r/y").unwrap();
/// let wanted: HashSet<String> = ["/r/x[2]".to_string()].into();
///
/// let kept = filter::filter_by_paths(&records, &wanted);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].value, "b");
/// ```
pub fn filter_by_paths<'a>(records: &'a [Record], paths: &HashSet<String>) -> Vec<&'a Record> {
    records.iter().filter(|r| paths.contains(&r.path)).collect()
}

/// Records whose path matches one of `paths` once indexes and predicates are
/// removed from both sides.
pub fn filter_by_stripped_paths<'a>(
    records: &'a [Record],
    paths: &HashSet<String>,
) -> Vec<&'a Record> {
    let wanted: HashSet<String> = paths.iter().map(|p| strip_qualifiers(p)).collect();
    records
        .iter()
        .filter(|r| wanted.contains(&r.stripped_path()))
        .collect()
}

/// Records whose final segment name is `key`.
pub fn filter_by_key<'a>(records: &'a [Record], key: &str) -> Vec<&'a Record> {
    records.iter().filter(|r| r.key == key).collect()
}

/// Read a path list: one entry per line, either a bare path or a full
/// `value : path` line. Blank lines are ignored.
pub fn path_set(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.rfind(" : /") {
            Some(split) => line[split + SEPARATOR.len()..].to_string(),
            None => line.to_string(),
        })
        .collect()
}

/// Keep the `value : path` lines of `lines` that pass every given filter.
///
/// `paths` is a path list (see [`path_set`]); with `loose`, paths are
/// compared after removing indexes and predicates. `key` keeps records whose
/// final segment name matches. With neither, every record is kept. Kept
/// lines are returned in input order.
pub fn filter_lines(
    lines: &str,
    paths: Option<&str>,
    key: Option<&str>,
    loose: bool,
) -> Result<Vec<Record>> {
    let mut kept = records_from_str(lines)?;
    if let Some(paths) = paths {
        let wanted = path_set(paths);
        let matched = if loose {
            filter_by_stripped_paths(&kept, &wanted)
        } else {
            filter_by_paths(&kept, &wanted)
        };
        kept = matched.into_iter().cloned().collect();
    }
    if let Some(key) = key {
        kept = filter_by_key(&kept, key).into_iter().cloned().collect();
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        records_from_str(
            "\
1 : /r/item/name
2 : /r/item[2]/name
3 : /r/item[@id=\"x\"]/price
4 : /r/other",
        )
        .unwrap()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_by_paths_exact() {
        let records = sample();
        let kept = filter_by_paths(&records, &set(&["/r/item/name", "/r/missing"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, "1");
    }

    #[test]
    fn test_filter_by_paths_empty_set() {
        let records = sample();
        assert!(filter_by_paths(&records, &HashSet::new()).is_empty());
    }

    #[test]
    fn test_filter_by_stripped_paths() {
        let records = sample();
        let kept = filter_by_stripped_paths(&records, &set(&["/r/item[1]/name"]));
        let values: Vec<&str> = kept.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["1", "2"]);

        let kept = filter_by_stripped_paths(&records, &set(&["/r/item/price"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].value, "3");
    }

    #[test]
    fn test_filter_by_key() {
        let records = sample();
        assert_eq!(filter_by_key(&records, "name").len(), 2);
        assert_eq!(filter_by_key(&records, "other").len(), 1);
        assert!(filter_by_key(&records, "nothing").is_empty());
    }

    #[test]
    fn test_path_set_accepts_lines_and_bare_paths() {
        let paths = path_set("/r/a\n\n  x : /r/b[2]  \n");
        assert_eq!(paths, set(&["/r/a", "/r/b[2]"]));
    }

    #[test]
    fn test_filter_lines() {
        let lines = "a : /r/x\nb : /r/x[2]\nc : /r/y";
        let strict = filter_lines(lines, Some("/r/x[2]\n"), None, false).unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].value, "b");

        let loose = filter_lines(lines, Some("/r/x[2]\n"), None, true).unwrap();
        let values: Vec<&str> = loose.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn test_filter_lines_by_key_and_paths() {
        let lines = "a : /r/x\nb : /r/g/x[2]\nc : /r/y\nd : /r/g/y";
        let by_key = filter_lines(lines, None, Some("x"), false).unwrap();
        let values: Vec<&str> = by_key.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b"]);

        let both = filter_lines(lines, Some("/r/g/x\n/r/g/y"), Some("x"), true).unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].value, "b");

        assert_eq!(filter_lines(lines, None, None, false).unwrap().len(), 4);
    }

    #[test]
    fn test_filter_lines_malformed_input() {
        assert!(filter_lines("garbage", Some("/r/x"), None, false).is_err());
    }
}
