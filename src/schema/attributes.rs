//! Annotation parsing for field and relation declarations.
//!
//! Annotations are `@name` or `@name(args)` tokens that follow the field type.
//! Argument text is captured with balanced parentheses, so nested calls such as
//! `@default(now())` keep their full argument. Relation arguments have their
//! own small grammar:
//!
//! ```text
//! args   := [string] { "," kwarg } | kwarg { "," kwarg }
//! kwarg  := ident ":" value
//! value  := list | string | word
//! list   := "[" [word { "," word }] "]"
//! ```
//!
//! Positions in errors are 0-based byte offsets into the text that was parsed;
//! the line parser translates them to line columns.

use thiserror::Error;

/// A single `@name(args)` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Raw argument text between the outer parentheses, trimmed.
    pub args: Option<String>,
    /// Byte offset of the `@`.
    pub offset: usize,
}

/// Syntax error inside annotation text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct AttributeError {
    pub offset: usize,
    pub message: String,
}

impl AttributeError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Parsed arguments of `@relation(...)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationArgs {
    pub label: Option<String>,
    pub fields: Vec<String>,
    pub references: Vec<String>,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn ident(&mut self) -> &'a str {
        self.take_while(|c| c.is_alphanumeric() || c == '_')
    }

    /// Consumes a quoted string, returning its contents. The cursor must be on
    /// the opening quote.
    fn string(&mut self) -> Result<&'a str, AttributeError> {
        let open = self.pos;
        let quote = self
            .bump()
            .ok_or_else(|| AttributeError::new(open, "expected string"))?;
        let start = self.pos;
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(&self.src[start..self.pos - c.len_utf8()]),
                Some('\\') => {
                    self.bump();
                }
                Some(_) => {}
                None => return Err(AttributeError::new(open, "unterminated string")),
            }
        }
    }

    /// Consumes a parenthesised group, returning the text between the outer
    /// parentheses. The cursor must be on `(`.
    fn balanced_parens(&mut self) -> Result<&'a str, AttributeError> {
        let open = self.pos;
        self.bump();
        let start = self.pos;
        let mut depth = 1usize;
        let mut prev = '(';
        while let Some(c) = self.peek() {
            match c {
                // A quote only opens a string at the start of an argument, so
                // apostrophes inside words (`o'neil`) stay plain text.
                '"' | '\'' if prev == '(' || prev == ',' || prev.is_whitespace() => {
                    self.string()?;
                    prev = c;
                    continue;
                }
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = &self.src[start..self.pos];
                        self.bump();
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            prev = c;
            self.bump();
        }
        Err(AttributeError::new(open, "unclosed '('"))
    }
}

/// Extracts every annotation from the text following a field type.
///
/// Text that is not part of an annotation is skipped.
pub fn parse_attributes(input: &str) -> Result<Vec<Attribute>, AttributeError> {
    let mut cursor = Cursor::new(input);
    let mut attributes = Vec::new();

    while !cursor.at_end() {
        if cursor.peek() != Some('@') {
            cursor.bump();
            continue;
        }
        let offset = cursor.pos;
        cursor.bump();
        let name = cursor.ident();
        if name.is_empty() {
            continue;
        }
        let args = if cursor.peek() == Some('(') {
            Some(cursor.balanced_parens()?.trim().to_string())
        } else {
            None
        };
        attributes.push(Attribute {
            name: name.to_string(),
            args,
            offset,
        });
    }

    Ok(attributes)
}

/// Parses the argument text of `@relation(...)`.
///
/// Keyword arguments other than `fields`, `references` and `name` are accepted
/// and ignored.
pub fn parse_relation_args(input: &str) -> Result<RelationArgs, AttributeError> {
    let mut cursor = Cursor::new(input);
    let mut args = RelationArgs::default();

    cursor.skip_ws();
    if matches!(cursor.peek(), Some('"') | Some('\'')) {
        args.label = Some(cursor.string()?.to_string());
        cursor.skip_ws();
        if !cursor.at_end() && !cursor.eat(',') {
            return Err(AttributeError::new(cursor.pos, "expected ',' after relation name"));
        }
    }

    loop {
        cursor.skip_ws();
        if cursor.at_end() {
            break;
        }
        let key_pos = cursor.pos;
        let key = cursor.ident();
        if key.is_empty() {
            return Err(AttributeError::new(key_pos, "expected argument name"));
        }
        cursor.skip_ws();
        if !cursor.eat(':') {
            return Err(AttributeError::new(cursor.pos, format!("expected ':' after '{}'", key)));
        }
        cursor.skip_ws();

        match (key, cursor.peek()) {
            ("fields", Some('[')) => args.fields = parse_list(&mut cursor)?,
            ("references", Some('[')) => args.references = parse_list(&mut cursor)?,
            ("name", Some('"')) | ("name", Some('\'')) => {
                args.label = Some(cursor.string()?.to_string());
            }
            ("fields", _) | ("references", _) => {
                return Err(AttributeError::new(cursor.pos, format!("expected '[' for '{}'", key)));
            }
            (_, Some('[')) => {
                parse_list(&mut cursor)?;
            }
            (_, Some('"')) | (_, Some('\'')) => {
                cursor.string()?;
            }
            _ => {
                cursor.take_while(|c| c != ',');
            }
        }

        cursor.skip_ws();
        if cursor.at_end() {
            break;
        }
        if !cursor.eat(',') {
            return Err(AttributeError::new(cursor.pos, "expected ',' between arguments"));
        }
    }

    Ok(args)
}

fn parse_list(cursor: &mut Cursor<'_>) -> Result<Vec<String>, AttributeError> {
    let open = cursor.pos;
    cursor.bump();
    let mut items = Vec::new();
    loop {
        cursor.skip_ws();
        match cursor.peek() {
            Some(']') => {
                cursor.bump();
                return Ok(items);
            }
            Some(',') => {
                cursor.bump();
            }
            Some(_) => {
                let item = cursor.take_while(|c| c != ',' && c != ']').trim();
                if !item.is_empty() {
                    items.push(item.to_string());
                }
            }
            None => return Err(AttributeError::new(open, "unclosed '['")),
        }
    }
}
