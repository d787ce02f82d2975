//! Line-oriented driver with a simple resynchronization policy.

use crate::{
    definition::ParseDef,
    parser::{Parser, Token},
};

/// A rejected span of the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ERROR PARSING FROM {start} to {end}")]
pub struct SyntaxError {
    pub start: usize,
    pub end: usize,
}

/// The summary of a driver run.
#[derive(Debug, Default)]
pub struct DriverReport {
    /// The number of batches the parser accepted.
    pub accepted: usize,

    /// One entry per rejected batch, in input order.
    pub errors: Vec<SyntaxError>,
}

impl DriverReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Feeds a token stream to a [`Parser`] one logical line at a time.
///
/// Tokens of an ignored kind are dropped before parsing. A line rejected at
/// its end of input is an unfinished statement: the whole batch is carried
/// into the next line's batch. A line rejected before its end is reported
/// and parsing resumes at the next line.
#[derive(Debug)]
pub struct LineDriver<TDef> {
    parser: Parser<TDef>,
    newline_kind: Option<usize>,
}

impl<TDef> LineDriver<TDef>
where
    TDef: ParseDef,
{
    pub fn new(parser: Parser<TDef>) -> Self {
        Self {
            parser,
            newline_kind: None,
        }
    }

    /// Specify the token kind that terminates a logical line.
    ///
    /// Without it, the whole stream is parsed as a single batch.
    pub fn newline_kind(mut self, kind: usize) -> Self {
        self.newline_kind = Some(kind);
        self
    }

    pub fn parser(&self) -> &Parser<TDef> {
        &self.parser
    }

    pub fn run<T>(&self, tokens: &[T]) -> DriverReport
    where
        T: Token + Clone,
    {
        let def = self.parser.definition();
        let mut report = DriverReport::default();
        let mut carried: Vec<T> = vec![];

        let mut lines = tokens
            .split(|t| Some(t.kind()) == self.newline_kind)
            .peekable();
        while let Some(line) = lines.next() {
            let mut batch = std::mem::take(&mut carried);
            batch.extend(line.iter().filter(|t| !def.is_ignored(t.kind())).cloned());
            if batch.is_empty() {
                continue;
            }

            let outcome = self.parser.parse(&batch);
            if outcome.accepted {
                report.accepted += 1;
                continue;
            }

            if outcome.remainder.is_empty() && lines.peek().is_some() {
                tracing::trace!(len = batch.len(), "unfinished line, carried over");
                carried = batch;
                continue;
            }

            if let Some((start, end)) = outcome.error_span() {
                let error = SyntaxError { start, end };
                tracing::debug!("{}", error);
                report.errors.push(error);
            }
        }

        report
    }
}
