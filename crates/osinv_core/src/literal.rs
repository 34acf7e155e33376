//! Reading structured literals out of rendered host variable values.
//!
//! Values such as `[1, 2, 'c']` or `{'a': 1}` are read as sequences and
//! mappings. Nested values may be quoted strings (either quote style),
//! numbers, booleans (`True`/`true`), none (`None`/`null`) and tuples, which
//! become sequences.

use serde_json::{Map, Number, Value};

use crate::error::LiteralError;

/// Deepest nesting of sequences and mappings accepted before giving up.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Parse a sequence or mapping literal.
///
/// Returns [`LiteralError::NotStructured`] if the input does not start with
/// `[` or `{`, and a syntax error if it does but cannot be read completely.
pub fn parse_literal(raw: &str) -> Result<Value, LiteralError> {
    let text = raw.trim();
    if !text.starts_with('[') && !text.starts_with('{') {
        return Err(LiteralError::NotStructured);
    }

    let mut parser = Parser::new(text);
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
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

    fn is_at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError::Syntax {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            Some(open @ ('[' | '(' | '{')) => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(self.error("too many nested parentheses"));
                }
                self.next_char();
                self.depth += 1;
                let value = match open {
                    '[' => self.parse_sequence(']'),
                    '(' => self.parse_sequence(')'),
                    _ => self.parse_mapping(),
                };
                self.depth -= 1;
                value
            }
            Some('\'' | '"') => self.parse_strings().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        loop {
            self.skip_whitespace();
            if self.eat(close) {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            trailing_comma = self.eat(',');
            if !trailing_comma {
                if self.eat(close) {
                    break;
                }
                return Err(self.error(format!("expected ',' or '{}'", close)));
            }
        }

        // `(x)` is a parenthesized value, `(x,)` a one element tuple
        if close == ')' && items.len() == 1 && !trailing_comma {
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn parse_mapping(&mut self) -> Result<Value, LiteralError> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }

            let key_offset = self.pos;
            let key = mapping_key(self.parse_value()?).ok_or(LiteralError::Syntax {
                offset: key_offset,
                message: "mapping keys must be scalar".to_string(),
            })?;

            self.skip_whitespace();
            if !self.eat(':') {
                return Err(self.error("expected ':'"));
            }
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            return Err(self.error("expected ',' or '}'"));
        }
    }

    /// Adjacent string literals are concatenated.
    fn parse_strings(&mut self) -> Result<String, LiteralError> {
        let mut out = String::new();
        while let Some(quote @ ('\'' | '"')) = self.peek() {
            self.next_char();
            self.parse_string(quote, &mut out)?;
            self.skip_whitespace();
        }
        Ok(out)
    }

    fn parse_string(&mut self, quote: char, out: &mut String) -> Result<(), LiteralError> {
        loop {
            let c = self
                .next_char()
                .ok_or_else(|| self.error("unterminated string"))?;
            match c {
                '\n' => return Err(self.error("unterminated string")),
                '\\' => self.parse_escape(out)?,
                c if c == quote => return Ok(()),
                c => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let c = self
            .next_char()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' | '\'' | '"' => out.push(c),
            '\n' => {}
            'x' => out.push(self.parse_hex_escape(2)?),
            'u' if self.eat('{') => out.push(self.parse_braced_escape()?),
            'u' => out.push(self.parse_hex_escape(4)?),
            'U' => out.push(self.parse_hex_escape(8)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn parse_hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        for _ in 0..digits {
            match self.next_char() {
                Some(c) if c.is_ascii_hexdigit() => {}
                _ => return Err(self.error("truncated escape sequence")),
            }
        }
        u32::from_str_radix(&self.src[start..self.pos], 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid escape sequence"))
    }

    /// `\u{1b}` as written by the template renderer for nested strings.
    fn parse_braced_escape(&mut self) -> Result<char, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            self.next_char();
        }
        let digits = &self.src[start..self.pos];
        if digits.is_empty() || digits.len() > 6 || !self.eat('}') {
            return Err(self.error("malformed escape sequence"));
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid escape sequence"))
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.next_char();
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.next_char();
                    if matches!(self.peek(), Some('-' | '+')) {
                        self.next_char();
                    }
                    continue;
                }
                _ => break,
            }
            self.next_char();
        }

        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            if let Ok(n) = text.parse::<u64>() {
                return Ok(Value::Number(n.into()));
            }
        }

        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::Syntax {
                offset: start,
                message: format!("invalid number '{}'", text),
            })
    }

    fn parse_keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.next_char();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(LiteralError::Syntax {
                offset: start,
                message: format!("unexpected name '{}'", word),
            }),
        }
    }
}

/// Mapping keys end up as JSON object keys, so scalars are converted the way
/// a JSON encoder would.
fn mapping_key(key: Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
