//! Sample grammars and helpers shared by the integration tests, the
//! benchmarks and the command line driver.

pub mod grammars;

use slrgen::grammar::{Grammar, SymbolID};
use slrgen_runtime::Lexeme;

/// The name of the terminal emitted for line breaks by [`tokenize`].
pub const NEWLINE: &str = "NEWLINE";

#[derive(Debug, thiserror::Error)]
#[error("unknown terminal `{word}' at offset {offset}")]
pub struct UnknownWord {
    pub word: String,
    pub offset: usize,
}

/// Split `source` into whitespace-separated words, each being the name of
/// a terminal symbol.
///
/// A line break yields a [`NEWLINE`] token when the grammar declares such
/// a terminal.
pub fn tokenize(g: &Grammar, source: &str) -> Result<Vec<Lexeme>, UnknownWord> {
    let newline = terminal_kind(g, NEWLINE);

    let mut tokens = vec![];
    let mut word_start = None;
    for (offset, ch) in source.char_indices() {
        if !ch.is_whitespace() {
            word_start.get_or_insert(offset);
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(word(g, &source[start..offset], start)?);
        }
        if let (Some(kind), '\n') = (newline, ch) {
            tokens.push(Lexeme::new("\n", kind, offset));
        }
    }
    if let Some(start) = word_start {
        tokens.push(word(g, &source[start..], start)?);
    }

    Ok(tokens)
}

fn word(g: &Grammar, word: &str, offset: usize) -> Result<Lexeme, UnknownWord> {
    match terminal_kind(g, word) {
        Some(kind) => Ok(Lexeme::new(word, kind, offset)),
        None => Err(UnknownWord {
            word: word.to_owned(),
            offset,
        }),
    }
}

/// Return the token kind of the terminal named `name`.
pub fn terminal_kind(g: &Grammar, name: &str) -> Option<usize> {
    match g.symbol_by_name(name)? {
        SymbolID::T(t) => t.kind(),
        SymbolID::N(..) => None,
    }
}
