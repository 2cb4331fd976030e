use crate::error::DtaError;
use crate::node::{ArrayKind, DataArray, Node};
use std::io::Read;
use std::iter::Peekable;
use std::str::Chars;

/// Read a whole DTA stream and decode it
pub fn from_reader<R: Read>(mut reader: R) -> Result<DataArray, DtaError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_bytes(&bytes)
}

/// Decode DTA bytes; text that isn't UTF-8 is taken as Latin-1
pub fn from_bytes(bytes: &[u8]) -> Result<DataArray, DtaError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => parse_str(text),
        Err(_) => {
            let text: String = bytes.iter().map(|&b| b as char).collect();
            parse_str(&text)
        }
    }
}

/// Parse DTA text into a root array holding every top-level node
pub fn parse_str(text: &str) -> Result<DataArray, DtaError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Parser::new(text).parse()
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn parse(mut self) -> Result<DataArray, DtaError> {
        let mut root = DataArray::new(ArrayKind::Array, 1);
        let mut stack: Vec<DataArray> = Vec::new();

        while let Some(&c) = self.chars.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                ';' => self.skip_line_comment(),
                '/' if self.block_comment_ahead() => self.skip_block_comment()?,
                '(' | '{' | '[' => {
                    self.bump();
                    let kind = match c {
                        '(' => ArrayKind::Array,
                        '{' => ArrayKind::Command,
                        _ => ArrayKind::Property,
                    };
                    stack.push(DataArray::new(kind, self.line));
                }
                ')' | '}' | ']' => {
                    self.bump();
                    let Some(array) = stack.pop() else {
                        return Err(DtaError::syntax(self.line, format!("unexpected `{}`", c)));
                    };
                    if array.kind().close() != c {
                        return Err(DtaError::syntax(
                            self.line,
                            format!(
                                "`{}` opened on line {} closed by `{}`",
                                array.kind().open(),
                                array.line(),
                                c
                            ),
                        ));
                    }
                    push(&mut root, &mut stack, Node::Array(array));
                }
                '"' => {
                    let text = self.string()?;
                    push(&mut root, &mut stack, Node::Str(text));
                }
                '\'' => {
                    let text = self.quoted_symbol()?;
                    push(&mut root, &mut stack, Node::Symbol(text));
                }
                _ => {
                    let atom = self.atom();
                    push(&mut root, &mut stack, classify(atom));
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(DtaError::syntax(
                self.line,
                format!("`{}` opened on line {} is never closed", open.kind().open(), open.line()),
            ));
        }
        Ok(root)
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn block_comment_ahead(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next() == Some('*')
    }

    fn skip_block_comment(&mut self) -> Result<(), DtaError> {
        let start = self.line;
        self.bump();
        self.bump();
        let mut previous = '\0';
        while let Some(c) = self.bump() {
            if previous == '*' && c == '/' {
                return Ok(());
            }
            previous = c;
        }
        Err(DtaError::syntax(start, "unterminated block comment"))
    }

    fn string(&mut self) -> Result<String, DtaError> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.chars.peek() {
                    Some('q') | Some('"') => {
                        self.bump();
                        text.push('"');
                    }
                    Some('n') => {
                        self.bump();
                        text.push('\n');
                    }
                    Some('\\') => {
                        self.bump();
                        text.push('\\');
                    }
                    _ => text.push('\\'),
                },
                Some(c) => text.push(c),
                None => return Err(DtaError::syntax(start, "unterminated string")),
            }
        }
    }

    fn quoted_symbol(&mut self) -> Result<String, DtaError> {
        let start = self.line;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(text),
                Some(c) => text.push(c),
                None => return Err(DtaError::syntax(start, "unterminated quoted symbol")),
            }
        }
    }

    fn atom(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || "(){}[];\"'".contains(c) {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }
}

/// Append to the innermost open array, or to the root at top level
fn push(root: &mut DataArray, stack: &mut [DataArray], node: Node) {
    stack.last_mut().unwrap_or(root).push(node);
}

/// Turn a bare token into a number, variable, directive or symbol
fn classify(atom: String) -> Node {
    if let Some(name) = atom.strip_prefix('$') {
        return Node::Variable(name.to_string());
    }
    if let Some(name) = atom.strip_prefix('#') {
        return Node::Directive(name.to_string());
    }

    let numeric_start = atom
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if numeric_start {
        if let Ok(value) = atom.parse::<i32>() {
            return Node::Int(value);
        }
        if let Ok(value) = atom.parse::<f32>() {
            return Node::Float(value);
        }
    }

    Node::Symbol(atom)
}
