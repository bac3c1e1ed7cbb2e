//! Macro call discovery.

use super::lexer::{Token, tokenize};
use super::parser::{Argument, Parser};

/// A located macro call and its first argument.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroCall {
    pub name: String,
    /// `None` when the call has no arguments.
    pub argument: Option<Argument>,
}

/// Locates macro calls in a script block.
///
/// Implementations must never evaluate the source.
pub trait MacroScanner: Send + Sync {
    /// The first call to any of `names` in `source`.
    fn find_call(&self, source: &str, names: &[String]) -> Option<MacroCall>;
}

/// Default scanner backed by the built-in tokenizer and literal parser.
///
/// Member calls (`x.definePageMeta(...)`) and declarations
/// (`function definePageMeta(...)`) do not count.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralScanner;

impl MacroScanner for LiteralScanner {
    fn find_call(&self, source: &str, names: &[String]) -> Option<MacroCall> {
        if !names.iter().any(|name| source.contains(name.as_str())) {
            return None;
        }

        let tokens = tokenize(source);
        let idx = (0..tokens.len()).find(|&i| is_call(&tokens, i, names))?;
        let Token::Ident(name) = tokens[idx] else {
            return None;
        };

        let argument = match tokens.get(idx + 2) {
            Some(token) if token.is_punct(")") => None,
            None => None,
            Some(_) => Some(Parser::new(&tokens, idx + 2).argument()),
        };
        Some(MacroCall {
            name: name.to_owned(),
            argument,
        })
    }
}

fn is_call(tokens: &[Token<'_>], i: usize, names: &[String]) -> bool {
    let Token::Ident(ident) = tokens[i] else {
        return false;
    };
    if !names.iter().any(|name| name == ident) {
        return false;
    }
    if !tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) {
        return false;
    }
    match i.checked_sub(1).map(|p| &tokens[p]) {
        Some(prev) => !(prev.is_punct(".") || prev.is_punct("?.") || prev.is_ident("function")),
        None => true,
    }
}
