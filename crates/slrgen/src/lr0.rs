//! Construction of the canonical collection of LR(0) item sets.

use crate::{
    grammar::{Grammar, NonterminalID, ProductionID, SymbolID, TerminalID},
    types::{Map, Set},
    util::display_fn,
};
use std::{collections::VecDeque, fmt};

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateID(u16);

impl fmt::Debug for StateID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S#{:03}", self.0)
    }
}

impl StateID {
    /// The state built from the augmenting production.
    pub const ROOT: Self = Self(0);

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn into_raw(self) -> u16 {
        self.0
    }
}

/// The LR(0) item, a production with a marked progress point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LR0Item {
    pub production: ProductionID,
    pub dot: u16,
}

impl LR0Item {
    pub const fn new(production: ProductionID) -> Self {
        Self { production, dot: 0 }
    }

    /// Whether the whole body has been matched.
    pub fn is_complete(&self, g: &Grammar) -> bool {
        usize::from(self.dot) >= g.production(self.production).body().len()
    }

    /// Return the symbol immediately after the dot.
    pub fn next_symbol(&self, g: &Grammar) -> Option<SymbolID> {
        g.production(self.production)
            .body()
            .get(usize::from(self.dot))
            .copied()
    }

    fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            let production = g.production(self.production);
            write!(f, "{} -> [", g.nonterminals[&production.head()])?;
            for (i, symbol) in production.body().iter().enumerate() {
                if i == usize::from(self.dot) {
                    f.write_str(" .")?;
                }
                write!(f, " {}", g.symbol_display(*symbol))?;
            }
            if self.is_complete(g) {
                f.write_str(" .")?;
            }
            f.write_str(" ]")
        })
    }
}

#[derive(Debug, Clone)]
pub struct LR0State {
    /// The items of this state, sorted. The sequence identifies the state.
    pub items: Vec<LR0Item>,
    pub shifts: Map<TerminalID, StateID>,
    pub gotos: Map<NonterminalID, StateID>,
    /// Whether this state contains at least one complete item.
    pub accepting: bool,
    /// Whether this state contains the complete augmenting production.
    pub is_final: bool,
}

impl LR0State {
    pub fn complete_items<'g>(&'g self, g: &'g Grammar) -> impl Iterator<Item = LR0Item> + 'g {
        self.items.iter().copied().filter(move |item| item.is_complete(g))
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            writeln!(f, "## items:")?;
            for item in &self.items {
                writeln!(f, "- {}", item.display(g))?;
            }
            if !self.shifts.is_empty() {
                writeln!(f, "## shifts:")?;
                for (t, to) in &self.shifts {
                    writeln!(f, "- {} => {:?}", g.terminals[t], to)?;
                }
            }
            if !self.gotos.is_empty() {
                writeln!(f, "## gotos:")?;
                for (n, to) in &self.gotos {
                    writeln!(f, "- {} => {:?}", g.nonterminals[n], to)?;
                }
            }
            Ok(())
        })
    }
}

#[derive(Debug)]
pub struct LR0Automaton {
    /// All reachable states, in order of discovery.
    pub states: Map<StateID, LR0State>,
}

impl LR0Automaton {
    /// Calculate the LR(0) automaton based on the specified grammar.
    pub fn build(g: &Grammar) -> Self {
        let mut state_id = {
            let mut next_state_id = 0;
            move || {
                let id = StateID(next_state_id);
                next_state_id += 1;
                id
            }
        };

        let mut states = Map::<StateID, LR0State>::default();
        let mut interned = Map::<Vec<LR0Item>, StateID>::default();
        let mut pending = VecDeque::<(StateID, Vec<LR0Item>)>::new();

        let root = state_id();
        let root_items = closure(g, [LR0Item::new(ProductionID::ACCEPT)]);
        interned.insert(root_items.clone(), root);
        pending.push_back((root, root_items));

        let mut advanced = Map::<SymbolID, Vec<LR0Item>>::default();
        while let Some((current, items)) = pending.pop_front() {
            advanced.clear();
            for item in &items {
                if let Some(symbol) = item.next_symbol(g) {
                    advanced.entry(symbol).or_default().push(item.advance());
                }
            }

            let mut shifts = Map::default();
            let mut gotos = Map::default();
            for (symbol, kernel) in advanced.drain(..) {
                let next_items = closure(g, kernel);
                let next = match interned.get(&next_items) {
                    Some(id) => *id,
                    None => {
                        let id = state_id();
                        interned.insert(next_items.clone(), id);
                        pending.push_back((id, next_items));
                        id
                    }
                };
                match symbol {
                    SymbolID::T(t) => {
                        shifts.insert(t, next);
                    }
                    SymbolID::N(n) => {
                        gotos.insert(n, next);
                    }
                }
            }

            let accepting = items.iter().any(|item| item.is_complete(g));
            let is_final = items
                .iter()
                .any(|item| item.production == ProductionID::ACCEPT && item.is_complete(g));
            states.insert(
                current,
                LR0State {
                    items,
                    shifts,
                    gotos,
                    accepting,
                    is_final,
                },
            );
        }

        tracing::debug!(states = states.len(), "LR(0) automaton built");

        Self { states }
    }

    pub fn start(&self) -> &LR0State {
        &self.states[&StateID::ROOT]
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for (i, (id, state)) in self.states.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(f, "#### State {:?}", id)?;
                if state.accepting {
                    f.write_str(" (accepting)")?;
                }
                if state.is_final {
                    f.write_str(" (final)")?;
                }
                writeln!(f)?;
                write!(f, "{}", state.display(g))?;
            }
            Ok(())
        })
    }
}

/// Expand the seed items with every item implied by a nonterminal after a dot.
fn closure<I>(g: &Grammar, seeds: I) -> Vec<LR0Item>
where
    I: IntoIterator<Item = LR0Item>,
{
    let mut items = Set::<LR0Item>::default();
    let mut expanded = Set::<NonterminalID>::default();
    let mut queue: VecDeque<LR0Item> = seeds.into_iter().collect();
    while let Some(item) = queue.pop_front() {
        if !items.insert(item) {
            continue;
        }
        if let Some(SymbolID::N(n)) = item.next_symbol(g) {
            if expanded.insert(n) {
                queue.extend(g.productions_of(n).map(|p| LR0Item::new(p.id())));
            }
        }
    }

    let mut items: Vec<_> = items.into_iter().collect();
    items.sort_unstable();
    items
}
