//! Reader for `song.ini`-style descriptors.
//!
//! The result is an ordered list of sections, each an ordered list of
//! key/value pairs. Re-inserting a key keeps its original position and
//! replaces the value, so the last occurrence in the file wins.

use crate::error::DescriptorError;
use song_primitives::FieldSource;
use std::path::Path;

/// How a descriptor is tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Later occurrences of a key overwrite earlier ones instead of failing
    pub allow_duplicate_keys: bool,

    /// Line prefixes that mark a whole line as a comment
    pub comment_prefixes: &'static [&'static str],
}

impl ParseOptions {
    /// Settings used for `song.ini` files: duplicates allowed, only `//` and `;` comments
    pub const SONG_INI: ParseOptions = ParseOptions {
        allow_duplicate_keys: true,
        comment_prefixes: &["//", ";"],
    };

    fn is_comment(&self, line: &str) -> bool {
        self.comment_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix))
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::SONG_INI
    }
}

/// One `[section]` of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns true when an existing value was replaced
    fn insert(&mut self, key: String, value: String) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                *existing = value;
                true
            }
            None => {
                self.entries.push((key, value));
                false
            }
        }
    }
}

/// Parsed descriptor file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    sections: Vec<Section>,
}

impl Descriptor {
    /// Read and parse the descriptor at `path`
    pub fn read(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| DescriptorError::io(path, e))?;
        Self::parse_bytes(bytes, options)
    }

    pub fn parse_bytes(bytes: Vec<u8>, options: &ParseOptions) -> Result<Self, DescriptorError> {
        let text = String::from_utf8(bytes)?;
        Self::parse_str(&text, options)
    }

    pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Self, DescriptorError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut descriptor = Descriptor::default();
        let mut current: Option<usize> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.trim();

            if line.is_empty() || options.is_comment(line) {
                continue;
            }

            if let Some(name) = line
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                current = Some(descriptor.section_index(name.trim()));
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(DescriptorError::MalformedLine {
                    line: line_number,
                    content: line.to_string(),
                });
            };

            // Keys ahead of the first header belong to the unnamed global section
            let index = *current.get_or_insert_with(|| descriptor.section_index(""));
            let section = &mut descriptor.sections[index];
            let key = key.trim().to_string();

            if !options.allow_duplicate_keys && section.contains_key(&key) {
                return Err(DescriptorError::DuplicateKey {
                    line: line_number,
                    section: section.name.clone(),
                    key,
                });
            }
            section.insert(key, value.trim().to_string());
        }

        Ok(descriptor)
    }

    /// Section with exactly this name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    fn section_index(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|section| section.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

impl FieldSource for Descriptor {
    fn try_get(&self, group: &str, key: &str) -> Option<String> {
        self.section(group)?.get(key).map(str::to_string)
    }
}

/// Parse the descriptor file at `path`
pub fn parse(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Descriptor, DescriptorError> {
    Descriptor::read(path, options)
}
