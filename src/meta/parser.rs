//! Static literal reader for macro arguments.
//!
//! Accepts object and array literals, strings, interpolation-free
//! templates, numbers, booleans and `null`. Anything else (identifiers,
//! calls, functions, spreads, computed keys, methods, operators) is not
//! a literal and is skipped up to the next delimiter.

use super::lexer::Token;
use serde_json::{Map, Number, Value};

/// One property of an object literal argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// A named property; `value` is `None` when it is not a literal.
    Keyed { key: String, value: Option<Value> },
    /// A spread, computed key or accessor.
    Opaque,
}

/// First argument of a macro call.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Object(Vec<Property>),
    Value(Value),
    Expression,
}

impl Argument {
    /// The argument as a fully static JSON value, if it is one.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Value(value) => Some(value.clone()),
            Self::Object(props) => properties_to_map(props).map(Value::Object),
            Self::Expression => None,
        }
    }
}

fn properties_to_map(props: &[Property]) -> Option<Map<String, Value>> {
    props
        .iter()
        .map(|prop| match prop {
            Property::Keyed {
                key,
                value: Some(value),
            } => Some((key.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

/// Deepest array / object nesting read as a literal.
const MAX_NESTING: usize = 64;

pub struct Parser<'t, 's> {
    tokens: &'t [Token<'s>],
    pos: usize,
    depth: usize,
}

impl<'t, 's> Parser<'t, 's> {
    pub fn new(tokens: &'t [Token<'s>], pos: usize) -> Self {
        Self { tokens, pos, depth: 0 }
    }

    fn peek(&self) -> Option<&'t Token<'s>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<&'t Token<'s>> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn at(&self, p: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn at_delimiter(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => [",", ")", "]", "}"].iter().any(|p| token.is_punct(p)),
        }
    }

    /// Read one call argument. An argument followed by `as T` or
    /// `satisfies T` keeps its literal reading.
    pub fn argument(&mut self) -> Argument {
        let start = self.pos;
        let argument = if self.at("{") {
            self.object_properties().map(Argument::Object)
        } else {
            self.value().map(Argument::Value)
        };

        if let Some(argument) = argument {
            if self
                .peek()
                .is_some_and(|t| t.is_ident("as") || t.is_ident("satisfies"))
            {
                self.skip_expression();
            }
            if self.at_delimiter() {
                return argument;
            }
        }

        self.pos = start;
        self.skip_expression();
        Argument::Expression
    }

    /// Properties of an object literal starting at `{`.
    fn object_properties(&mut self) -> Option<Vec<Property>> {
        if !self.at("{") {
            return None;
        }
        self.bump();

        let mut props = Vec::new();
        loop {
            if self.at("}") {
                self.bump();
                return Some(props);
            }

            if self.at("...") {
                self.bump();
                self.skip_expression();
                props.push(Property::Opaque);
            } else if self.at("[") {
                self.skip_balanced();
                if self.at(":") {
                    self.bump();
                }
                self.skip_expression();
                props.push(Property::Opaque);
            } else {
                let key = match self.bump()? {
                    Token::Ident(name) => (*name).to_owned(),
                    Token::Number(text) => (*text).to_owned(),
                    Token::Str(text) => text.clone(),
                    _ => return None,
                };

                if self.at(":") {
                    self.bump();
                    let start = self.pos;
                    let value = self.value().filter(|_| self.at_delimiter());
                    if value.is_none() {
                        self.pos = start;
                        self.skip_expression();
                    }
                    props.push(Property::Keyed { key, value });
                } else if self.at("(") {
                    // method shorthand
                    self.skip_balanced();
                    if self.at("{") {
                        self.skip_balanced();
                    }
                    props.push(Property::Keyed { key, value: None });
                } else if self.at_delimiter() {
                    // shorthand property
                    props.push(Property::Keyed { key, value: None });
                } else {
                    // accessor or modifier (`get x() {}`, `async x() {}`)
                    self.skip_expression();
                    props.push(Property::Opaque);
                }
            }

            if self.at(",") {
                self.bump();
            } else if !self.at("}") {
                return None;
            }
        }
    }

    fn value(&mut self) -> Option<Value> {
        if self.at("{") || self.at("[") {
            if self.depth >= MAX_NESTING {
                return None;
            }
            self.depth += 1;
            let value = self.container();
            self.depth -= 1;
            return value;
        }

        match self.bump()? {
            Token::Str(text) => Some(Value::String(text.clone())),
            Token::Number(text) => number_value(text),
            Token::Ident("true") => Some(Value::Bool(true)),
            Token::Ident("false") => Some(Value::Bool(false)),
            Token::Ident("null") => Some(Value::Null),
            _ => None,
        }
    }

    fn container(&mut self) -> Option<Value> {
        if self.at("{") {
            let props = self.object_properties()?;
            return properties_to_map(&props).map(Value::Object);
        }

        self.bump();
        let mut items = Vec::new();
        loop {
            if self.at("]") {
                self.bump();
                return Some(Value::Array(items));
            }
            items.push(self.value()?);
            if self.at(",") {
                self.bump();
            } else if !self.at("]") {
                return None;
            }
        }
    }

    /// Skip to the next delimiter at the current nesting depth.
    fn skip_expression(&mut self) {
        while !self.at_delimiter() {
            if self.at("(") || self.at("[") || self.at("{") {
                self.skip_balanced();
            } else {
                self.bump();
            }
        }
    }

    /// Skip a bracketed group starting at an opening bracket.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.bump() {
            if ["(", "[", "{"].iter().any(|p| token.is_punct(p)) {
                depth += 1;
            } else if [")", "]", "}"].iter().any(|p| token.is_punct(p)) {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }
}

fn number_value(text: &str) -> Option<Value> {
    let text = text.replace('_', "");
    if text.ends_with('n') {
        return None;
    }
    let lower = text.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return i64::from_str_radix(digits, radix).ok().map(Value::from);
        }
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
