//! Turn `value : path` lines back into structured records.
//!
//! This is pure string work; no tree or policy is needed. Each line becomes a
//! [`Record`] keyed by the last element name of its path, and a set of
//! records can be folded into a nested JSON value with [`nest`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between the value and the path of one line.
pub const SEPARATOR: &str = " : ";

/// One `value : path` line, decomposed.
///
/// ```
/// use leafpath::v1::reverse;
///
/// let record = reverse::parse_line(r#"9.99 : /shop/item[@id="7"][2]/price"#).unwrap();
/// assert_eq!(record.key, "price");
/// assert_eq!(record.value, "9.99");
/// assert_eq!(record.segments, vec!["shop", "item", "price"]);
/// assert_eq!(record.stripped_path(), "/shop/item/price");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Name of the final path segment.
    pub key: String,
    pub value: String,
    /// The path exactly as it appeared on the line.
    pub path: String,
    /// Element names along the path with predicates and indexes removed.
    pub segments: Vec<String>,
}

impl Record {
    pub fn stripped_path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.value, SEPARATOR, self.path)
    }
}

/// Parse one line. The split happens at the last `" : /"`, so values may
/// themselves contain `" : "`.
pub fn parse_line(line: &str) -> Result<Record> {
    parse_numbered_line(line, 1)
}

fn parse_numbered_line(line: &str, line_number: usize) -> Result<Record> {
    let line = line.trim_end_matches(['\r', '\n']);
    let malformed = || Error::MalformedLine {
        line_number,
        line: line.to_string(),
    };

    let split = line.rfind(" : /").ok_or_else(malformed)?;
    let value = &line[..split];
    let path = &line[split + SEPARATOR.len()..];

    let segments: Vec<String> = strip_qualifiers(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let key = segments.last().cloned().ok_or_else(malformed)?;

    Ok(Record {
        key,
        value: value.to_string(),
        path: path.to_string(),
        segments,
    })
}

/// Parse every non-blank line of `text`.
///
/// # Errors
///
/// Fails on the first line that has no `" : /"` separator, reporting its
/// 1-based line number.
pub fn records_from_str(text: &str) -> Result<Vec<Record>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_numbered_line(line, i + 1))
        .collect()
}

/// Remove every bracketed fragment (`[@a="b"]`, `[3]`) from a path.
///
/// Inside a predicate, a quote opens a value and only a quote directly
/// followed by `]` closes it, so values may contain quotes, brackets and
/// slashes. A value that itself contains `"]` cannot be told apart from the
/// end of its predicate.
///
/// ```
/// use leafpath::v1::reverse::strip_qualifiers;
///
/// assert_eq!(strip_qualifiers(r#"/a[@k="x]y"][2]/b[1]"#), "/a/b");
/// ```
pub fn strip_qualifiers(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut scanner = QualifierScanner::default();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        if scanner.step(c, chars.peek().copied()) {
            out.push(c);
        }
    }

    out
}

/// Split a raw path into segments, keeping qualifiers attached.
fn raw_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut scanner = QualifierScanner::default();
    let mut start = 0;
    let mut chars = path.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        if scanner.step(c, next) && c == '/' {
            if i > start {
                segments.push(&path[start..i]);
            }
            start = i + 1;
        }
    }
    if start < path.len() {
        segments.push(&path[start..]);
    }

    segments
}

/// Tracks whether the scan is inside `[...]` qualifiers or a quoted value.
#[derive(Default)]
struct QualifierScanner {
    depth: usize,
    in_quotes: bool,
}

impl QualifierScanner {
    /// Feed `c` (followed by `next`); true when `c` lies outside any qualifier.
    fn step(&mut self, c: char, next: Option<char>) -> bool {
        if self.in_quotes {
            if c == '"' && next == Some(']') {
                self.in_quotes = false;
            }
            return false;
        }
        match c {
            '"' if self.depth > 0 => self.in_quotes = true,
            '[' => self.depth += 1,
            ']' if self.depth > 0 => self.depth -= 1,
            _ if self.depth == 0 => return true,
            _ => {}
        }
        false
    }
}

/// Split a trailing `[N]` off a segment. Segments without one are occurrence 1.
fn split_index(segment: &str) -> (&str, usize) {
    if let Some(body) = segment.strip_suffix(']')
        && let Some(open) = body.rfind('[')
        && let Ok(n) = body[open + 1..].parse::<usize>()
        && n > 0
    {
        return (&segment[..open], n);
    }
    (segment, 1)
}

/// Upper bound on the `null` padding one [`nest`] call may create, unless
/// the input has even more records.
pub const NEST_PADDING_LIMIT: usize = 65_536;

/// Fold records into one nested JSON object.
///
/// Object keys are segments without their index (predicates are kept, so
/// `item[@id="1"]` and `item[@id="2"]` stay apart). Indexed siblings become
/// arrays ordered by index; gaps left by elements that produced no leaves
/// are `null`. Leaf values are strings.
///
/// # Errors
///
/// The padding needed for gaps is budgeted at the larger of the record count
/// and [`NEST_PADDING_LIMIT`]. A record whose index would exceed what is left
/// of that budget is reported as [`Error::MalformedLine`], numbered by its
/// position in `records`.
///
/// ```
/// use leafpath::v1::reverse;
/// use serde_json::json;
///
/// let records = reverse::records_from_str("a : /r/x\nb : /r/x[2]\nc : /r/y/z").unwrap();
/// assert_eq!(
///     reverse::nest(&records).unwrap(),
///     json!({ "r": { "x": ["a", "b"], "y": { "z": "c" } } })
/// );
/// ```
pub fn nest(records: &[Record]) -> Result<Value> {
    let mut root = Map::new();
    let mut budget = records.len().max(NEST_PADDING_LIMIT);

    for (i, record) in records.iter().enumerate() {
        let steps: Vec<(&str, usize)> = raw_segments(&record.path)
            .into_iter()
            .map(split_index)
            .collect();
        if !insert(&mut root, &steps, &record.value, &mut budget) {
            return Err(Error::MalformedLine {
                line_number: i + 1,
                line: record.to_string(),
            });
        }
    }

    let mut value = Value::Object(root);
    collapse(&mut value);
    Ok(value)
}

/// Returns false when the padding for `steps` would exceed `budget`.
fn insert(
    obj: &mut Map<String, Value>,
    steps: &[(&str, usize)],
    leaf: &str,
    budget: &mut usize,
) -> bool {
    let Some(((name, index), rest)) = steps.split_first() else {
        return true;
    };

    let slots = obj
        .entry(name.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if !slots.is_array() {
        *slots = Value::Array(vec![slots.take()]);
    }
    let Value::Array(slots) = slots else {
        return true;
    };
    if slots.len() < *index {
        let growth = index - slots.len();
        if growth > *budget {
            return false;
        }
        *budget -= growth;
        slots.resize(*index, Value::Null);
    }
    let slot = &mut slots[index - 1];

    if rest.is_empty() {
        *slot = Value::String(leaf.to_string());
        return true;
    }
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(child) => insert(child, rest, leaf, budget),
        _ => true,
    }
}

/// Unwrap single-element arrays produced while inserting.
fn collapse(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for v in map.values_mut() {
                if let Value::Array(items) = v
                    && items.len() == 1
                {
                    *v = items.remove(0);
                }
                collapse(v);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(collapse),
        _ => {}
    }
}
