use song_primitives::FieldSource;
use std::fmt;

/// Bracket style of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// `( ... )`
    Array,
    /// `{ ... }`, a script command
    Command,
    /// `[ ... ]`, a property reference
    Property,
}

impl ArrayKind {
    pub(crate) fn open(&self) -> char {
        match self {
            ArrayKind::Array => '(',
            ArrayKind::Command => '{',
            ArrayKind::Property => '[',
        }
    }

    pub(crate) fn close(&self) -> char {
        match self {
            ArrayKind::Array => ')',
            ArrayKind::Command => '}',
            ArrayKind::Property => ']',
        }
    }
}

/// One token of a data array
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Int(i32),
    Float(f32),
    /// Bare or `'quoted'` symbol
    Symbol(String),
    /// `"double quoted"` string
    Str(String),
    /// `$name`
    Variable(String),
    /// `#define`, `#include`, ...
    Directive(String),
    Array(DataArray),
}

impl Node {
    /// Scalar value as text; arrays have none
    pub fn as_text(&self) -> Option<String> {
        match self {
            Node::Int(value) => Some(value.to_string()),
            Node::Float(value) => Some(value.to_string()),
            Node::Symbol(text) | Node::Str(text) => Some(text.clone()),
            Node::Variable(_) | Node::Directive(_) | Node::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&DataArray> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }
}

/// Bracketed list of nodes; the root of a file is an array without brackets
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    kind: ArrayKind,
    line: usize,
    children: Vec<Node>,
}

impl DataArray {
    pub fn new(kind: ArrayKind, line: usize) -> Self {
        Self {
            kind,
            line,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    /// Line of the opening bracket (1-based)
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Leading symbol or string, the key the array is known by
    pub fn name(&self) -> Option<&str> {
        match self.children.first()? {
            Node::Symbol(name) | Node::Str(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// First value after the name
    pub fn value(&self) -> Option<&Node> {
        self.children.get(1)
    }

    /// Child arrays, in order
    pub fn arrays(&self) -> impl Iterator<Item = &DataArray> {
        self.children.iter().filter_map(Node::as_array)
    }

    /// First child array named `name`
    pub fn find(&self, name: &str) -> Option<&DataArray> {
        self.arrays().find(|array| array.name() == Some(name))
    }

    /// Follow a chain of child array names, e.g. `["song", "name"]`
    pub fn find_path(&self, path: &[&str]) -> Option<&DataArray> {
        path.iter()
            .try_fold(self, |array, name| array.find(name))
    }
}

/// Groups are child arrays of a song entry; `""` is the entry itself.
impl FieldSource for DataArray {
    fn try_get(&self, group: &str, key: &str) -> Option<String> {
        let path: &[&str] = if group.is_empty() { &[key] } else { &[group, key] };
        self.find_path(path)?.value()?.as_text()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Int(value) => write!(f, "{}", value),
            Node::Float(value) => write!(f, "{:?}", value),
            Node::Symbol(text) => {
                if text.is_empty() || text.chars().any(|c| c.is_whitespace() || "(){}[];\"'".contains(c)) {
                    write!(f, "'{}'", text)
                } else {
                    f.write_str(text)
                }
            }
            Node::Str(text) => write!(f, "\"{}\"", text.replace('"', "\\q")),
            Node::Variable(name) => write!(f, "${}", name),
            Node::Directive(name) => write!(f, "#{}", name),
            Node::Array(array) => write!(f, "{}", array),
        }
    }
}

impl fmt::Display for DataArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.open())?;
        for (index, child) in self.children.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, "{}", self.kind.close())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    const ENTRY: &str = r#"
        (mysong
           (name "My Song")
           (artist "Some Band")
           (song (name "songs/mysong/mysong") (hopo_threshold 170))
           (rank (guitar 220) (bass 0))
           (year_released 2008)
           (tuning_offset_cents -1.5))
    "#;

    fn entry() -> DataArray {
        let root = parse_str(ENTRY).unwrap();
        let entry = root.arrays().next().unwrap().clone();
        entry
    }

    #[test]
    fn entry_is_named_by_leading_symbol() {
        assert_eq!(entry().name(), Some("mysong"));
    }

    #[test]
    fn top_level_fields_use_empty_group() {
        let entry = entry();
        assert_eq!(entry.try_get("", "name").as_deref(), Some("My Song"));
        assert_eq!(entry.try_get("", "year_released").as_deref(), Some("2008"));
        assert_eq!(entry.try_get("", "tuning_offset_cents").as_deref(), Some("-1.5"));
        assert_eq!(entry.try_get("", "album_name"), None);
    }

    #[test]
    fn nested_groups_resolve_child_arrays() {
        let entry = entry();
        assert_eq!(
            entry.try_get("song", "name").as_deref(),
            Some("songs/mysong/mysong")
        );
        assert_eq!(entry.try_get("rank", "guitar").as_deref(), Some("220"));
        assert_eq!(entry.try_get("rank", "drum"), None);
        assert_eq!(entry.try_get("missing", "name"), None);
    }

    #[test]
    fn array_values_have_no_text() {
        // (song (name ...)) has an array as its value
        assert_eq!(entry().try_get("", "song"), None);
    }

    #[test]
    fn find_path_walks_nested_arrays() {
        let entry = entry();
        let threshold = entry.find_path(&["song", "hopo_threshold"]).unwrap();
        assert_eq!(threshold.value(), Some(&Node::Int(170)));
        assert!(entry.find_path(&["song", "nope"]).is_none());
    }

    #[test]
    fn displays_as_dta_text() {
        let root = parse_str("(a 'two words' \"say \\qhi\\q\" 1 2.5 {cmd $x})").unwrap();
        assert_eq!(
            root.arrays().next().unwrap().to_string(),
            "(a 'two words' \"say \\qhi\\q\" 1 2.5 {cmd $x})"
        );
    }
}
