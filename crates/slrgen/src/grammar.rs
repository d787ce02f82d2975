//! Grammar types.

use crate::{types::Map, util::display_fn};
use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TerminalID(u16);

impl TerminalID {
    /// Reserved symbol used as a terminal symbol that means the end of input.
    pub const EOI: Self = Self(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.0
    }

    /// Return the lexer token kind of this terminal, i.e. its position in
    /// the declaration order.
    pub fn kind(self) -> Option<usize> {
        self.0.checked_sub(Self::OFFSET).map(usize::from)
    }
}

impl fmt::Debug for TerminalID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            &Self::EOI => write!(f, "T#End"),
            _ => write!(f, "T#{:03}", self.0),
        }
    }
}

#[derive(Debug)]
pub struct Terminal {
    id: TerminalID,
    name: String,
    ignored: bool,
}

impl Terminal {
    pub fn id(&self) -> TerminalID {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the tokens of this terminal must be dropped before parsing.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonterminalID(u16);

impl NonterminalID {
    /// The synthetic start symbol of the augmented grammar.
    pub const START: Self = Self(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for NonterminalID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            &Self::START => write!(f, "N#Start"),
            _ => write!(f, "N#{:03}", self.0),
        }
    }
}

#[derive(Debug)]
pub struct Nonterminal {
    id: NonterminalID,
    name: String,
}

impl Nonterminal {
    pub fn id(&self) -> NonterminalID {
        self.id
    }

    /// Return the text of this symbol, which is empty for the synthetic
    /// start symbol.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            NonterminalID::START => f.write_str("$start"),
            _ => f.write_str(&self.name),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum SymbolID {
    T(TerminalID),
    N(NonterminalID),
}

impl fmt::Debug for SymbolID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::T(t) => write!(f, "{:?}", t),
            Self::N(n) => write!(f, "{:?}", n),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductionID(u16);

impl ProductionID {
    /// The augmenting production `$start -> S`.
    pub const ACCEPT: Self = Self(0);

    const OFFSET: u16 = 1;

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn into_raw(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for ProductionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            &Self::ACCEPT => write!(f, "P#Accept"),
            _ => write!(f, "P#{:03}", self.0),
        }
    }
}

/// The type that represents a production rule in grammar.
#[derive(Debug)]
pub struct Production {
    id: ProductionID,
    head: NonterminalID,
    body: Vec<SymbolID>,
}

impl Production {
    pub fn id(&self) -> ProductionID {
        self.id
    }

    /// Return the left-hand side of this production.
    pub fn head(&self) -> NonterminalID {
        self.head
    }

    /// Return the right-hand side of this production.
    pub fn body(&self) -> &[SymbolID] {
        &self.body[..]
    }

    // `"LHS -> R1 R2 R3"`
    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            write!(f, "{} ->", g.nonterminals[&self.head])?;
            for symbol in &self.body {
                write!(f, " {}", g.symbol_display(*symbol))?;
            }
            Ok(())
        })
    }
}

/// The grammar definition used to derive the parser tables.
#[derive(Debug)]
#[non_exhaustive]
pub struct Grammar {
    /// Terminal symbols in declaration order, starting with `$`.
    pub terminals: Map<TerminalID, Terminal>,
    pub nonterminals: Map<NonterminalID, Nonterminal>,
    /// Production rules, starting with the augmenting production.
    pub productions: Map<ProductionID, Production>,
    pub start_symbol: NonterminalID,
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in self.terminals.values() {
            if terminal.id == TerminalID::EOI {
                continue;
            }
            write!(f, "{}", terminal)?;
            if terminal.ignored {
                write!(f, " (ignored)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## nonterminals:")?;
        for nonterminal in self.nonterminals.values() {
            if nonterminal.id == NonterminalID::START {
                continue;
            }
            write!(f, "{}", nonterminal)?;
            if nonterminal.id == self.start_symbol {
                write!(f, " (start)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## productions:")?;
        for production in self.productions.values() {
            writeln!(f, "{}: {}", production.id.0, production.display(self))?;
        }

        Ok(())
    }
}

impl Grammar {
    /// Define a grammar using the specified function.
    pub fn define<F>(f: F) -> Result<Self, GrammarDefError>
    where
        F: FnOnce(&mut GrammarDef) -> Result<(), GrammarDefError>,
    {
        let mut def = GrammarDef::default();
        f(&mut def)?;
        def.end()
    }

    pub fn production(&self, id: ProductionID) -> &Production {
        &self.productions[&id]
    }

    /// Translate a lexer token kind into the terminal declared at that position.
    pub fn terminal_by_kind(&self, kind: usize) -> Option<TerminalID> {
        let raw = u16::try_from(kind).ok()?.checked_add(TerminalID::OFFSET)?;
        let id = TerminalID(raw);
        self.terminals.contains_key(&id).then_some(id)
    }

    /// Look up a declared symbol by its text.
    pub fn symbol_by_name(&self, name: &str) -> Option<SymbolID> {
        if let Some(t) = self.terminals.values().find(|t| t.name == name) {
            return Some(SymbolID::T(t.id));
        }
        self.nonterminals
            .values()
            .find(|n| n.name == name)
            .map(|n| SymbolID::N(n.id))
    }

    pub fn symbol_display(&self, symbol: SymbolID) -> &dyn fmt::Display {
        match symbol {
            SymbolID::T(t) => &self.terminals[&t],
            SymbolID::N(n) => &self.nonterminals[&n],
        }
    }

    /// Return the productions whose head is the specified symbol.
    pub fn productions_of(&self, head: NonterminalID) -> impl Iterator<Item = &Production> + '_ {
        self.productions.values().filter(move |p| p.head == head)
    }
}

/// The contextural values for building a `Grammar`.
#[derive(Debug)]
pub struct GrammarDef {
    terminals: Map<TerminalID, Terminal>,
    nonterminals: Map<NonterminalID, Nonterminal>,
    productions: Map<ProductionID, Production>,
    start: Option<NonterminalID>,
    next_terminal_id: u16,
    next_nonterminal_id: u16,
    next_production_id: u16,
}

impl Default for GrammarDef {
    fn default() -> Self {
        let mut def = GrammarDef {
            terminals: Map::default(),
            nonterminals: Map::default(),
            productions: Map::default(),
            start: None,
            next_terminal_id: TerminalID::OFFSET,
            next_nonterminal_id: NonterminalID::OFFSET,
            next_production_id: ProductionID::OFFSET,
        };

        def.terminals.insert(
            TerminalID::EOI,
            Terminal {
                id: TerminalID::EOI,
                name: "$".into(),
                ignored: false,
            },
        );
        def.nonterminals.insert(
            NonterminalID::START,
            Nonterminal {
                id: NonterminalID::START,
                name: String::new(),
            },
        );

        def
    }
}

impl GrammarDef {
    /// Declare a terminal symbol used in this grammar.
    ///
    /// Terminals must be declared in the order of the lexer's token kinds.
    pub fn terminal(&mut self, name: &str) -> Result<TerminalID, GrammarDefError> {
        self.declare_terminal(name, false)
    }

    /// Declare a terminal symbol whose tokens never reach the parser,
    /// e.g. whitespace.
    pub fn ignored_terminal(&mut self, name: &str) -> Result<TerminalID, GrammarDefError> {
        self.declare_terminal(name, true)
    }

    fn declare_terminal(
        &mut self,
        name: &str,
        ignored: bool,
    ) -> Result<TerminalID, GrammarDefError> {
        self.verify_new_name(name)?;

        let id = TerminalID(self.next_terminal_id);
        self.next_terminal_id += 1;
        self.terminals.insert(
            id,
            Terminal {
                id,
                name: name.to_owned(),
                ignored,
            },
        );

        Ok(id)
    }

    /// Declare a nonterminal symbol used in this grammar.
    pub fn nonterminal(&mut self, name: &str) -> Result<NonterminalID, GrammarDefError> {
        self.verify_new_name(name)?;

        let id = NonterminalID(self.next_nonterminal_id);
        self.next_nonterminal_id += 1;
        self.nonterminals.insert(
            id,
            Nonterminal {
                id,
                name: name.to_owned(),
            },
        );

        Ok(id)
    }

    /// Specify a production rule into this grammer.
    pub fn rule<I>(&mut self, head: NonterminalID, body: I) -> Result<ProductionID, GrammarDefError>
    where
        I: IntoIterator<Item = SymbolID>,
    {
        if head == NonterminalID::START || !self.nonterminals.contains_key(&head) {
            return Err(GrammarDefError::UnknownSymbolId(SymbolID::N(head)));
        }

        let body: Vec<SymbolID> = body.into_iter().collect();
        for symbol in &body {
            let declared = match symbol {
                SymbolID::T(t) => *t != TerminalID::EOI && self.terminals.contains_key(t),
                SymbolID::N(n) => *n != NonterminalID::START && self.nonterminals.contains_key(n),
            };
            if !declared {
                return Err(GrammarDefError::UnknownSymbolId(*symbol));
            }
        }

        if let Some(existing) = self
            .productions
            .values()
            .find(|p| p.head == head && p.body == body)
        {
            return Err(GrammarDefError::DuplicateRule(self.describe(existing)));
        }

        let id = ProductionID(self.next_production_id);
        self.next_production_id += 1;
        self.productions.insert(id, Production { id, head, body });

        Ok(id)
    }

    /// Specify a production rule by the text of its symbols.
    pub fn rule_by_name(
        &mut self,
        head: &str,
        body: &[&str],
    ) -> Result<ProductionID, GrammarDefError> {
        let head = match self.lookup(head)? {
            SymbolID::N(n) => n,
            SymbolID::T(..) => return Err(GrammarDefError::HeadNotNonterminal(head.to_owned())),
        };
        let body = body
            .iter()
            .map(|name| self.lookup(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.rule(head, body)
    }

    /// Specify the start symbol for this grammar.
    ///
    /// Defaults to the head of the first production rule.
    pub fn start_symbol(&mut self, symbol: NonterminalID) -> Result<(), GrammarDefError> {
        if symbol == NonterminalID::START || !self.nonterminals.contains_key(&symbol) {
            return Err(GrammarDefError::UnknownSymbolId(SymbolID::N(symbol)));
        }
        self.start.replace(symbol);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<SymbolID, GrammarDefError> {
        let found = self
            .terminals
            .values()
            .find(|t| t.id != TerminalID::EOI && t.name == name)
            .map(|t| SymbolID::T(t.id))
            .or_else(|| {
                self.nonterminals
                    .values()
                    .find(|n| n.id != NonterminalID::START && n.name == name)
                    .map(|n| SymbolID::N(n.id))
            });
        found.ok_or_else(|| GrammarDefError::UndeclaredSymbol(name.to_owned()))
    }

    fn verify_new_name(&self, name: &str) -> Result<(), GrammarDefError> {
        if !verify_ident(name) {
            return Err(GrammarDefError::InvalidName(name.to_owned()));
        }
        if self.lookup(name).is_ok() {
            return Err(GrammarDefError::DuplicateName(name.to_owned()));
        }
        Ok(())
    }

    fn describe(&self, production: &Production) -> String {
        let mut s = self.nonterminals[&production.head].name.clone();
        s.push_str(" ->");
        for symbol in &production.body {
            s.push(' ');
            match symbol {
                SymbolID::T(t) => s.push_str(&self.terminals[t].name),
                SymbolID::N(n) => s.push_str(&self.nonterminals[n].name),
            }
        }
        s
    }

    fn end(self) -> Result<Grammar, GrammarDefError> {
        let start = match self.start {
            Some(start) => start,
            None => self
                .productions
                .values()
                .next()
                .map(|p| p.head)
                .ok_or(GrammarDefError::EmptyGrammar)?,
        };

        for nonterminal in self.nonterminals.values() {
            if nonterminal.id != NonterminalID::START
                && self.productions.values().all(|p| p.head != nonterminal.id)
            {
                tracing::warn!(
                    "the nonterminal `{}' has no associated production rule",
                    nonterminal.name
                );
            }
        }

        let mut productions = Map::default();
        productions.insert(
            ProductionID::ACCEPT,
            Production {
                id: ProductionID::ACCEPT,
                head: NonterminalID::START,
                body: vec![SymbolID::N(start)],
            },
        );
        productions.extend(self.productions);

        Ok(Grammar {
            terminals: self.terminals,
            nonterminals: self.nonterminals,
            productions,
            start_symbol: start,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarDefError {
    #[error("invalid symbol name: `{0}'")]
    InvalidName(String),

    #[error("the symbol `{0}' has already been declared")]
    DuplicateName(String),

    #[error("undeclared symbol: `{0}'")]
    UndeclaredSymbol(String),

    #[error("the head of a production rule must be a nonterminal: `{0}'")]
    HeadNotNonterminal(String),

    #[error("the symbol {0:?} is not declared in this grammar")]
    UnknownSymbolId(SymbolID),

    #[error("duplicate production rule: `{0}'")]
    DuplicateRule(String),

    #[error("the grammar has no production rules")]
    EmptyGrammar,
}

fn verify_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(ch) => ch,
        // The identifier must not be empty.
        None => return false,
    };
    if !is_ident_start(first) {
        return false;
    }
    chars.all(is_ident_continue)
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || unicode_ident::is_xid_start(ch)
}

fn is_ident_continue(ch: char) -> bool {
    unicode_ident::is_xid_continue(ch)
}
