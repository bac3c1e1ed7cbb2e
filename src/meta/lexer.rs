//! Minimal JavaScript / TypeScript tokenizer.
//!
//! Only precise enough to find macro calls and read literal arguments:
//! comments are skipped, strings and interpolation-free templates are
//! cooked, and everything that cannot be a literal (regex literals,
//! interpolated templates, unterminated strings) collapses into
//! [`Token::Opaque`].

/// Keywords after which a `/` starts a regex literal.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "of", "new", "delete", "void", "throw",
    "instanceof", "yield", "await",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'s> {
    Ident(&'s str),
    /// Cooked string or template literal without interpolation.
    Str(String),
    Number(&'s str),
    Punct(&'s str),
    Opaque,
}

impl Token<'_> {
    pub fn is_punct(&self, p: &str) -> bool {
        matches!(self, Token::Punct(q) if *q == p)
    }

    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Token::Ident(i) if *i == name)
    }
}

/// Split `source` into tokens. Never fails; malformed input degrades to
/// opaque tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer {
        src: source,
        pos: 0,
        tokens: Vec::new(),
    }
    .run()
}

struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    tokens: Vec<Token<'s>>,
}

impl<'s> Lexer<'s> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn run(mut self) -> Vec<Token<'s>> {
        while let Some(c) = self.peek() {
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(),
                '/' if self.regex_allowed() => self.regex(),
                '"' | '\'' => {
                    self.bump();
                    self.string(c);
                }
                '`' => {
                    self.bump();
                    self.template();
                }
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.number(),
                c if is_ident_start(c) => self.ident(),
                _ => self.punct(),
            }
        }
        self.tokens
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        match self.src[self.pos + 2..].find("*/") {
            Some(end) => self.pos += end + 4,
            None => self.pos = self.src.len(),
        }
    }

    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(Token::Punct(p)) => !matches!(*p, ")" | "]" | "}"),
            Some(Token::Ident(word)) => REGEX_KEYWORDS.contains(word),
            _ => false,
        }
    }

    fn regex(&mut self) {
        let start = self.pos;
        self.bump();
        let mut in_class = false;
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    while self.peek().is_some_and(is_ident_part) {
                        self.bump();
                    }
                    self.tokens.push(Token::Opaque);
                    return;
                }
                '\n' => break,
                _ => {}
            }
        }
        // not a regex literal, read the slash as an operator
        self.pos = start + 1;
        self.tokens.push(Token::Punct("/"));
    }

    /// Opening quote already consumed.
    fn string(&mut self, quote: char) {
        let mut value = String::new();
        while let Some(c) = self.bump() {
            match c {
                c if c == quote => {
                    self.tokens.push(Token::Str(value));
                    return;
                }
                '\\' => self.escape(&mut value),
                '\n' => break,
                c => value.push(c),
            }
        }
        self.tokens.push(Token::Opaque);
    }

    /// Opening backtick already consumed.
    fn template(&mut self) {
        let mut value = String::new();
        let mut interpolated = false;
        while let Some(c) = self.bump() {
            match c {
                '`' => {
                    let token = if interpolated {
                        Token::Opaque
                    } else {
                        Token::Str(value)
                    };
                    self.tokens.push(token);
                    return;
                }
                '\\' => self.escape(&mut value),
                '$' if self.peek() == Some('{') => {
                    self.bump();
                    interpolated = true;
                    self.skip_interpolation();
                }
                c => value.push(c),
            }
        }
        self.tokens.push(Token::Opaque);
    }

    fn skip_interpolation(&mut self) {
        let mut depth = 1usize;
        while let Some(c) = self.bump() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                '"' | '\'' => {
                    self.string(c);
                    self.tokens.pop();
                }
                '`' => {
                    self.template();
                    self.tokens.pop();
                }
                _ => {}
            }
        }
    }

    fn escape(&mut self, out: &mut String) {
        let Some(c) = self.bump() else {
            return;
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => out.push(self.hex_escape(2).unwrap_or(char::REPLACEMENT_CHARACTER)),
            'u' if self.peek() == Some('{') => {
                self.bump();
                let rest = &self.src[self.pos..];
                let digits = rest
                    .find(|c: char| !c.is_ascii_hexdigit())
                    .unwrap_or(rest.len());
                let c = if rest[digits..].starts_with('}') {
                    u32::from_str_radix(&rest[..digits], 16)
                        .ok()
                        .and_then(char::from_u32)
                } else {
                    None
                };
                // Unterminated escapes consume only their hex digits.
                self.pos += digits;
                if self.peek() == Some('}') {
                    self.bump();
                }
                out.push(c.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => out.push(self.hex_escape(4).unwrap_or(char::REPLACEMENT_CHARACTER)),
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            c => out.push(c),
        }
    }

    fn hex_escape(&mut self, len: usize) -> Option<char> {
        let digits = self.src.get(self.pos..self.pos + len)?;
        let value = u32::from_str_radix(digits, 16).ok()?;
        self.pos += len;
        char::from_u32(value)
    }

    fn number(&mut self) {
        let start = self.pos;
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-')
                && matches!(prev, 'e' | 'E')
                && !self.src[start..].starts_with("0x")
                && !self.src[start..].starts_with("0X");
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
        self.tokens.push(Token::Number(&self.src[start..self.pos]));
    }

    fn ident(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        self.tokens.push(Token::Ident(&self.src[start..self.pos]));
    }

    fn punct(&mut self) {
        let start = self.pos;
        let rest = &self.src[start..];
        let len = if rest.starts_with("...") {
            3
        } else if rest.starts_with("?.") || rest.starts_with("=>") {
            2
        } else {
            rest.chars().next().map_or(1, char::len_utf8)
        };
        self.pos += len;
        self.tokens.push(Token::Punct(&self.src[start..start + len]));
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric()
}
