//! The stack-driven SLR parsing engine.

use crate::definition::{Movement, ParseDef};
use std::fmt;

/// The number of consecutive steps without progress tolerated before the
/// engine gives up on the input.
pub const STUCK_LIMIT: usize = 3;

/// A trait for abstracting tokens produced by an external tokenizer.
pub trait Token {
    /// Return the terminal kind, an index into the terminal declaration order.
    fn kind(&self) -> usize;

    /// Return the byte offset of this token in the source text.
    fn offset(&self) -> usize;

    /// Return the matched text.
    fn value(&self) -> &str;
}

/// A plain token record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub value: String,
    pub kind: usize,
    pub offset: usize,
}

impl Lexeme {
    pub fn new(value: impl Into<String>, kind: usize, offset: usize) -> Self {
        Self {
            value: value.into(),
            kind,
            offset,
        }
    }
}

impl Token for Lexeme {
    fn kind(&self) -> usize {
        self.kind
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn value(&self) -> &str {
        &self.value
    }
}

impl<T: Token + ?Sized> Token for &T {
    fn kind(&self) -> usize {
        (**self).kind()
    }

    fn offset(&self) -> usize {
        (**self).offset()
    }

    fn value(&self) -> &str {
        (**self).value()
    }
}

/// The result of running the engine over one token batch.
#[derive(Debug)]
pub struct ParseOutcome<'t, T> {
    /// Whether the whole batch has been recognized.
    pub accepted: bool,

    /// The unconsumed tokens, starting at the token under the cursor
    /// when the engine rejected. Always empty on acceptance.
    pub remainder: &'t [T],

    /// The number of iterations the main loop performed.
    pub steps: usize,

    end_offset: usize,
}

impl<'t, T: Token> ParseOutcome<'t, T> {
    /// Return the byte range to report for a rejected batch.
    ///
    /// When the engine failed at the end of input, the remainder is empty
    /// and both ends point at the end of the last token.
    pub fn error_span(&self) -> Option<(usize, usize)> {
        if self.accepted {
            return None;
        }
        match (self.remainder.first(), self.remainder.last()) {
            (Some(first), Some(last)) => Some((first.offset(), last.offset())),
            _ => Some((self.end_offset, self.end_offset)),
        }
    }
}

/// A stack frame: the symbol pushed by a shift or a goto, followed by the
/// state entered on it. The bottom frame carries no symbol.
struct Frame<'t, T, TState, TNonterminal> {
    symbol: Option<StackSymbol<'t, T, TNonterminal>>,
    state: TState,
}

enum StackSymbol<'t, T, TNonterminal> {
    T(&'t T),
    N(TNonterminal),
}

fn display_stack<'a, T, TState, TNonterminal>(
    frames: &'a [Frame<'a, T, TState, TNonterminal>],
) -> impl fmt::Display + 'a
where
    T: Token,
    TState: fmt::Debug,
    TNonterminal: fmt::Debug,
{
    crate::util::display_fn(move |f| {
        for (i, frame) in frames.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match &frame.symbol {
                Some(StackSymbol::T(token)) => write!(f, "{:?} ", token.value())?,
                Some(StackSymbol::N(n)) => write!(f, "{:?} ", n)?,
                None => (),
            }
            write!(f, "{:?}", frame.state)?;
        }
        Ok(())
    })
}

#[derive(Debug)]
enum Rejection {
    UnknownTokenKind(usize),
    MissingAction,
    MissingGoto,
    StackUnderflow,
    Stuck,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTokenKind(kind) => write!(f, "no terminal for token kind {}", kind),
            Self::MissingAction => f.write_str("no action table entry"),
            Self::MissingGoto => f.write_str("no goto table entry"),
            Self::StackUnderflow => f.write_str("reduction deeper than the stack"),
            Self::Stuck => write!(f, "no progress for more than {} steps", STUCK_LIMIT),
        }
    }
}

/// The parser driven based on a compiled parse table.
///
/// The parser itself is immutable; every call to [`Parser::parse`] owns a
/// private stack and cursor.
#[derive(Debug, Clone)]
pub struct Parser<TDef> {
    definition: TDef,
}

impl<TDef> Parser<TDef>
where
    TDef: ParseDef,
{
    /// Create an instance of `Parser` using the specified parse table.
    pub fn new(definition: TDef) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &TDef {
        &self.definition
    }

    /// Run the automaton over `tokens` until it accepts or rejects.
    ///
    /// Ignored token kinds must already be filtered out by the caller.
    pub fn parse<'t, T: Token>(&self, tokens: &'t [T]) -> ParseOutcome<'t, T> {
        let def = &self.definition;
        let end_offset = tokens
            .last()
            .map_or(0, |t| t.offset() + t.value().len());

        let mut frames: Vec<Frame<'t, T, TDef::State, TDef::Nonterminal>> = vec![Frame {
            symbol: None,
            state: def.initial_state(),
        }];
        let mut cursor = 0;
        let mut steps = 0;
        let mut idle = 0;

        let reject = move |cursor: usize, steps: usize, reason: Rejection| {
            tracing::debug!(cursor, steps, "rejected: {}", reason);
            ParseOutcome {
                accepted: false,
                remainder: &tokens[cursor..],
                steps,
                end_offset,
            }
        };

        loop {
            steps += 1;

            let current = match frames.last() {
                Some(frame) => frame.state,
                None => return reject(cursor, steps, Rejection::StackUnderflow),
            };
            let lookahead = match tokens.get(cursor) {
                Some(token) => match def.terminal(token.kind()) {
                    Some(t) => t,
                    None => {
                        return reject(cursor, steps, Rejection::UnknownTokenKind(token.kind()))
                    }
                },
                None => def.end_of_input(),
            };
            tracing::trace!(?lookahead, "stack: {}", display_stack(&frames));
            let before = (current, cursor);

            match def.action(current, lookahead) {
                Some(Movement::Shift(next)) => match tokens.get(cursor) {
                    Some(token) => {
                        frames.push(Frame {
                            symbol: Some(StackSymbol::T(token)),
                            state: next,
                        });
                        cursor += 1;
                    }
                    None => return reject(cursor, steps, Rejection::MissingAction),
                },

                Some(Movement::Reduce(production)) => {
                    // the bottom frame is never popped.
                    let (lhs, n) = def.production(production);
                    if n >= frames.len() {
                        return reject(cursor, steps, Rejection::StackUnderflow);
                    }
                    frames.truncate(frames.len() - n);

                    let top = match frames.last() {
                        Some(frame) => frame.state,
                        None => return reject(cursor, steps, Rejection::StackUnderflow),
                    };
                    match def.goto(top, lhs) {
                        Some(Movement::Goto(next)) => frames.push(Frame {
                            symbol: Some(StackSymbol::N(lhs)),
                            state: next,
                        }),
                        _ => return reject(cursor, steps, Rejection::MissingGoto),
                    }
                }

                Some(Movement::Accept) => {
                    tracing::debug!(steps, "accepted");
                    return ParseOutcome {
                        accepted: true,
                        remainder: &tokens[tokens.len()..],
                        steps,
                        end_offset,
                    };
                }

                Some(Movement::Goto(..)) | None => {
                    return reject(cursor, steps, Rejection::MissingAction)
                }
            }

            let after = frames.last().map(|frame| (frame.state, cursor));
            if after == Some(before) {
                idle += 1;
                if idle > STUCK_LIMIT {
                    return reject(cursor, steps, Rejection::Stuck);
                }
            } else {
                idle = 0;
            }
        }
    }
}
