//! Reader for the Lua data files of a quest.
//!
//! Those files are chunks of function calls taking one table constructor,
//! e.g. `tile_pattern{ id = 3, x = {0, 8, 16} }`. Only that subset is
//! understood: named and positional fields, integers, strings, booleans and
//! nested tables, plus `--` and `--[[ ]]` comments. No Lua code runs.

use crate::error::ParseError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LuaValue {
    Int(i64),
    Str(String),
    Bool(bool),
    Table(LuaTable),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LuaTable {
    /// Positional entries, in order.
    pub items: Vec<LuaValue>,
    /// `key = value` entries, in order.
    pub fields: Vec<(String, LuaValue)>,
}

impl LuaTable {
    pub fn get(&self, key: &str) -> Option<&LuaValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// `name{ .. }` statement with the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuaCall {
    pub name: String,
    pub line: usize,
    pub table: LuaTable,
}

impl LuaCall {
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, message)
    }

    pub fn int(&self, key: &str) -> Result<Option<i64>, ParseError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(LuaValue::Int(v)) => Ok(Some(*v)),
            Some(_) => Err(self.error(format!("'{key}' must be an integer"))),
        }
    }

    pub fn string(&self, key: &str) -> Result<Option<&str>, ParseError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(LuaValue::Str(s)) => Ok(Some(s)),
            Some(_) => Err(self.error(format!("'{key}' must be a string"))),
        }
    }

    /// A scalar integer or a list of integers, returned as a list.
    pub fn int_list(&self, key: &str) -> Result<Option<Vec<i64>>, ParseError> {
        match self.table.get(key) {
            None => Ok(None),
            Some(LuaValue::Int(v)) => Ok(Some(vec![*v])),
            Some(LuaValue::Table(t)) if t.fields.is_empty() => t
                .items
                .iter()
                .map(|item| match item {
                    LuaValue::Int(v) => Ok(*v),
                    _ => Err(self.error(format!("'{key}' must only contain integers"))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.error(format!("'{key}' must be an integer or a list of integers"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Name(String),
    Int(i64),
    Str(String),
    Punct(char),
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn tokenize(mut self) -> Result<Vec<(Token, usize)>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(&c) = self.chars.peek() {
            let line = self.line;
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '-' => {
                    self.bump();
                    if self.chars.peek() == Some(&'-') {
                        self.bump();
                        self.skip_comment()?;
                    } else {
                        tokens.push((Token::Punct('-'), line));
                    }
                }
                '"' | '\'' => {
                    self.bump();
                    tokens.push((Token::Str(self.string(c)?), line));
                }
                c if c.is_ascii_digit() => tokens.push((Token::Int(self.integer()?), line)),
                c if c.is_alphabetic() || c == '_' => tokens.push((Token::Name(self.name()), line)),
                '{' | '}' | '(' | ')' | ',' | ';' | '=' => {
                    self.bump();
                    tokens.push((Token::Punct(c), line));
                }
                other => {
                    return Err(ParseError::new(line, format!("unexpected character '{other}'")));
                }
            }
        }
        Ok(tokens)
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        let start = self.line;
        let mut lookahead = self.chars.clone();
        if lookahead.next() == Some('[') && lookahead.next() == Some('[') {
            self.bump();
            self.bump();
            let mut previous = '\0';
            loop {
                match self.bump() {
                    Some(']') if previous == ']' => return Ok(()),
                    Some(c) => previous = c,
                    None => return Err(ParseError::new(start, "unterminated comment")),
                }
            }
        }
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
        Ok(())
    }

    fn string(&mut self, quote: char) -> Result<String, ParseError> {
        let start = self.line;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(c @ ('\\' | '"' | '\'')) => text.push(c),
                    Some(c) => {
                        return Err(ParseError::new(self.line, format!("unknown escape '\\{c}'")));
                    }
                    None => return Err(ParseError::new(start, "unterminated string")),
                },
                Some('\n') | None => return Err(ParseError::new(start, "unterminated string")),
                Some(c) => text.push(c),
            }
        }
    }

    fn integer(&mut self) -> Result<i64, ParseError> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '.' {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        digits
            .parse()
            .map_err(|_| ParseError::new(self.line, format!("'{digits}' is not an integer")))
    }

    fn name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    last_line: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_second(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.last_line, |(_, l)| *l)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == Some(&Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: char) -> Result<(), ParseError> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(ParseError::new(self.line(), format!("expected '{punct}'")))
        }
    }

    fn chunk(&mut self) -> Result<Vec<LuaCall>, ParseError> {
        let mut calls = Vec::new();
        while self.peek().is_some() {
            if self.eat(';') {
                continue;
            }
            calls.push(self.call()?);
        }
        Ok(calls)
    }

    fn call(&mut self) -> Result<LuaCall, ParseError> {
        let line = self.line();
        let name = match self.advance() {
            Some(Token::Name(name)) => name,
            _ => return Err(ParseError::new(line, "expected a function call")),
        };
        let parenthesized = self.eat('(');
        self.expect('{')?;
        let table = self.table()?;
        if parenthesized {
            self.expect(')')?;
        }
        Ok(LuaCall { name, line, table })
    }

    /// Table body; the opening brace is already consumed.
    fn table(&mut self) -> Result<LuaTable, ParseError> {
        let mut table = LuaTable::default();
        loop {
            if self.eat('}') {
                return Ok(table);
            }
            let named = matches!(self.peek(), Some(Token::Name(_)))
                && self.peek_second() == Some(&Token::Punct('='));
            if named {
                let Some(Token::Name(key)) = self.advance() else {
                    return Err(ParseError::new(self.line(), "expected a field name"));
                };
                self.expect('=')?;
                let value = self.value()?;
                table.fields.push((key, value));
            } else {
                let value = self.value()?;
                table.items.push(value);
            }
            if !self.eat(',') && !self.eat(';') {
                self.expect('}')?;
                return Ok(table);
            }
        }
    }

    fn value(&mut self) -> Result<LuaValue, ParseError> {
        let line = self.line();
        match self.advance() {
            Some(Token::Int(v)) => Ok(LuaValue::Int(v)),
            Some(Token::Punct('-')) => match self.advance() {
                Some(Token::Int(v)) => Ok(LuaValue::Int(-v)),
                _ => Err(ParseError::new(line, "expected a number after '-'")),
            },
            Some(Token::Str(s)) => Ok(LuaValue::Str(s)),
            Some(Token::Name(n)) if n == "true" => Ok(LuaValue::Bool(true)),
            Some(Token::Name(n)) if n == "false" => Ok(LuaValue::Bool(false)),
            Some(Token::Punct('{')) => self.table().map(LuaValue::Table),
            Some(other) => Err(ParseError::new(line, format!("unexpected {other:?}"))),
            None => Err(ParseError::new(line, "unexpected end of file")),
        }
    }
}

/// Parses a whole data file into its statements.
pub fn parse_calls(source: &str) -> Result<Vec<LuaCall>, ParseError> {
    let last_line = source.lines().count().max(1);
    let tokens = Lexer::new(source).tokenize()?;
    Parser {
        tokens,
        pos: 0,
        last_line,
    }
    .chunk()
}

/// Quotes `text` as a Lua string literal.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_named_and_positional_fields() {
        let src = "-- header\nbackground_color{ 48, 8, 120 }\n\ntile_pattern{\n  id = 3,\n  ground = \"wall\", -- trailing\n  x = {0, 8, -16},\n}\n";
        let calls = parse_calls(src).unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name, "background_color");
        assert_eq!(
            calls[0].table.items,
            vec![LuaValue::Int(48), LuaValue::Int(8), LuaValue::Int(120)]
        );
        let pattern = &calls[1];
        assert_eq!(pattern.line, 4);
        assert_eq!(pattern.int("id").unwrap(), Some(3));
        assert_eq!(pattern.string("ground").unwrap(), Some("wall"));
        assert_eq!(pattern.int_list("x").unwrap(), Some(vec![0, 8, -16]));
        assert_eq!(pattern.int_list("y").unwrap(), None);
    }

    #[test]
    fn accepts_parenthesized_calls_and_block_comments() {
        let src = "--[[ generated\n file ]]\nquest({ write_dir = 'save', title_bar = \"A \\\"quest\\\"\" })";
        let calls = parse_calls(src).unwrap();
        assert_eq!(calls[0].line, 3);
        assert_eq!(calls[0].string("write_dir").unwrap(), Some("save"));
        assert_eq!(calls[0].string("title_bar").unwrap(), Some("A \"quest\""));
    }

    #[test]
    fn reports_line_of_errors() {
        let err = parse_calls("tile_pattern{\n  id = 1.5\n}").unwrap_err();
        assert_eq!(err.line, 2);
        let err = parse_calls("tile_pattern{ id = 1 ").unwrap_err();
        assert_eq!(err.message, "expected '}'");
        let err = parse_calls("x = 3").unwrap_err();
        assert_eq!(err.message, "expected '{'");
        let err = parse_calls("t{ name = \"open").unwrap_err();
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let calls = parse_calls("t{ id = \"one\", x = { 1, \"a\" } }").unwrap();
        assert!(calls[0].int("id").is_err());
        assert!(calls[0].int_list("x").is_err());
    }

    #[test]
    fn quote_escapes_specials() {
        let quoted = quote("a \"b\"\\");
        assert_eq!(quoted, "\"a \\\"b\\\"\\\\\"");
        let calls = parse_calls(&format!("t{{ s = {quoted} }}")).unwrap();
        assert_eq!(calls[0].string("s").unwrap(), Some("a \"b\"\\"));
    }
}
