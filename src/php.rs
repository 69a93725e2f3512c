//! Reader and writer for the PHP array-literal language files used by the
//! file backend.
//!
//! Group files are a single `return` statement over a nested array literal.
//! The writer reproduces PHP's `var_export` output byte-for-byte so rewritten
//! files stay interoperable with existing language directories; the reader
//! accepts both the long `array ( … )` and short `[ … ]` syntax.

use serde_json::{Map, Number, Value};

/// Serialize a nested translation map as a complete group file.
pub fn export_file(map: &Map<String, Value>) -> String {
    format!(
        "<?php\n\nreturn {};\n",
        export_value(&Value::Object(map.clone()), 0)
    )
}

fn export_value(value: &Value, level: usize) -> String {
    match value {
        Value::Object(map) => {
            let pad = "  ".repeat(level + 1);
            let mut out = String::from("array (\n");
            for (key, val) in map {
                out.push_str(&pad);
                out.push_str(&export_key(key));
                out.push_str(" => ");
                match val {
                    Value::Object(_) => {
                        // var_export leaves a trailing space after `=>` and
                        // opens the nested array on its own line.
                        out.push('\n');
                        out.push_str(&pad);
                        out.push_str(&export_value(val, level + 1));
                        out.push_str(",\n");
                    }
                    scalar => {
                        out.push_str(&export_scalar(scalar));
                        out.push_str(",\n");
                    }
                }
            }
            out.push_str(&"  ".repeat(level));
            out.push(')');
            out
        }
        scalar => export_scalar(scalar),
    }
}

fn export_key(key: &str) -> String {
    if is_int_key(key) {
        key.to_string()
    } else {
        quote_single(key)
    }
}

fn is_int_key(key: &str) -> bool {
    !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'))
}

fn export_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => quote_single(s),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Null => "NULL".to_string(),
        Value::Array(_) | Value::Object(_) => unreachable!("handled by export_value"),
    }
}

fn quote_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Parse a complete group file back into a nested translation map.
///
/// Returns a description of the first syntax problem on failure; the caller
/// attaches the file path.
pub fn parse_file(source: &str) -> Result<Map<String, Value>, String> {
    let mut parser = Parser {
        source,
        pos: source.find("<?php").map_or(0, |i| i + "<?php".len()),
    };

    parser.skip_trivia();
    if !parser.eat_keyword("return") {
        return Err("expected `return` statement".to_string());
    }
    parser.skip_trivia();

    let value = parser.parse_value()?;
    parser.skip_trivia();
    if !parser.eat(";") {
        return Err(parser.unexpected("`;`"));
    }
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.unexpected("end of file"));
    }

    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected array literal, found {other}")),
    }
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.rest().starts_with(keyword) {
            let after = self.rest()[keyword.len()..].chars().next();
            if !matches!(after, Some(c) if c.is_alphanumeric() || c == '_') {
                self.pos += keyword.len();
                return true;
            }
        }
        false
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if let Some(c) = rest.chars().next()
                && c.is_whitespace()
            {
                self.pos += c.len_utf8();
                continue;
            }
            if rest.starts_with("//") || rest.starts_with('#') {
                match rest.find('\n') {
                    Some(i) => self.pos += i + 1,
                    None => self.pos = self.source.len(),
                }
                continue;
            }
            if rest.starts_with("/*") {
                match rest.find("*/") {
                    Some(i) => self.pos += i + 2,
                    None => self.pos = self.source.len(),
                }
                continue;
            }
            break;
        }
    }

    fn unexpected(&self, expected: &str) -> String {
        let found: String = self.rest().chars().take(12).collect();
        if found.is_empty() {
            format!("expected {expected}, found end of file")
        } else {
            format!("expected {expected}, found `{found}`")
        }
    }

    fn parse_value(&mut self) -> Result<Value, String> {
        self.skip_trivia();
        match self.peek() {
            Some('\'') | Some('"') => self.parse_string().map(Value::String),
            Some('[') => {
                self.pos += 1;
                self.parse_entries(']')
            }
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            _ => {
                if self.eat_keyword("array") {
                    self.skip_trivia();
                    if !self.eat("(") {
                        return Err(self.unexpected("`(`"));
                    }
                    self.parse_entries(')')
                } else if self.eat_keyword("true") {
                    Ok(Value::Bool(true))
                } else if self.eat_keyword("false") {
                    Ok(Value::Bool(false))
                } else if self.eat_keyword("null") || self.eat_keyword("NULL") {
                    Ok(Value::Null)
                } else {
                    Err(self.unexpected("a value"))
                }
            }
        }
    }

    fn parse_entries(&mut self, closer: char) -> Result<Value, String> {
        let mut map = Map::new();
        let mut next_index: u64 = 0;

        loop {
            self.skip_trivia();
            if self.peek() == Some(closer) {
                self.pos += 1;
                break;
            }
            if self.at_end() {
                return Err(format!("expected `{closer}`, found end of file"));
            }

            let first = self.parse_value()?;
            self.skip_trivia();

            if self.eat("=>") {
                let key = match &first {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    other => return Err(format!("invalid array key {other}")),
                };
                let value = self.parse_value()?;
                map.insert(key, value);
            } else {
                map.insert(next_index.to_string(), first);
                next_index += 1;
            }

            self.skip_trivia();
            if self.eat(",") {
                continue;
            }
            if self.peek() == Some(closer) {
                self.pos += 1;
                break;
            }
            return Err(self.unexpected(&format!("`,` or `{closer}`")));
        }

        Ok(Value::Object(map))
    }

    fn parse_string(&mut self) -> Result<String, String> {
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.unexpected("a string")),
        };
        self.pos += 1;

        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            if c == quote {
                self.pos += i + 1;
                return Ok(out);
            }
            if c == '\\' {
                match chars.next() {
                    Some((_, esc)) => {
                        if quote == '\'' {
                            // Single-quoted strings only escape `'` and `\`.
                            if esc == '\'' || esc == '\\' {
                                out.push(esc);
                            } else {
                                out.push('\\');
                                out.push(esc);
                            }
                        } else {
                            match esc {
                                'n' => out.push('\n'),
                                't' => out.push('\t'),
                                'r' => out.push('\r'),
                                '"' | '\\' | '$' => out.push(esc),
                                other => {
                                    out.push('\\');
                                    out.push(other);
                                }
                            }
                        }
                    }
                    None => return Err("unterminated string".to_string()),
                }
            } else {
                out.push(c);
            }
        }
        Err("unterminated string".to_string())
    }

    fn parse_number(&mut self) -> Result<Value, String> {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || *c == '-' && *i == 0))
            .map_or(rest.len(), |(i, _)| i);
        let literal = &rest[..end];
        let number: i64 = literal
            .parse()
            .map_err(|_| format!("invalid number `{literal}`"))?;
        self.pos += end;
        Ok(Value::Number(Number::from(number)))
    }
}
