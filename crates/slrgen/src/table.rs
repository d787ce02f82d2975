//! Compilation of the SLR action and goto tables.

use crate::{
    first_follow::{FirstSets, FollowSets},
    grammar::{Grammar, NonterminalID, ProductionID, TerminalID},
    lr0::{LR0Automaton, StateID},
    types::Map,
    util::display_fn,
};
use std::fmt;

pub type Movement = slrgen_runtime::Movement<StateID, ProductionID>;

/// A table cell where a reduction replaced a shift.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: StateID,
    pub terminal: TerminalID,
    pub shift: StateID,
    pub reduce: ProductionID,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseTable {
    pub actions: Map<StateID, Map<TerminalID, Movement>>,
    pub gotos: Map<StateID, Map<NonterminalID, Movement>>,
    pub conflicts: Vec<Conflict>,
}

impl ParseTable {
    /// Derive the decision tables from the LR(0) automaton.
    ///
    /// Each accepting state reduces by the complete item with the shortest
    /// body on every terminal in FOLLOW of its head. A reduction overwrites
    /// a shift on the same terminal.
    #[tracing::instrument(skip_all)]
    pub fn compile(
        lr0: &LR0Automaton,
        first: &FirstSets,
        follow: &FollowSets,
        g: &Grammar,
    ) -> Self {
        tracing::trace!("first sets:\n{}", first.display(g));

        let mut actions = Map::<StateID, Map<TerminalID, Movement>>::default();
        let mut gotos = Map::<StateID, Map<NonterminalID, Movement>>::default();
        let mut conflicts = vec![];

        for (id, state) in &lr0.states {
            let mut row: Map<TerminalID, Movement> = state
                .shifts
                .iter()
                .map(|(t, next)| (*t, Movement::Shift(*next)))
                .collect();
            gotos.insert(
                *id,
                state
                    .gotos
                    .iter()
                    .map(|(n, next)| (*n, Movement::Goto(*next)))
                    .collect(),
            );

            let selected = state
                .complete_items(g)
                .min_by_key(|item| g.production(item.production).body().len());
            if let Some(item) = selected {
                let production = g.production(item.production);
                if production.id() == ProductionID::ACCEPT {
                    row.insert(TerminalID::EOI, Movement::Accept);
                } else {
                    for t in follow.get(production.head()).iter() {
                        let replaced = row.insert(t, Movement::Reduce(production.id()));
                        if let Some(Movement::Shift(shift)) = replaced {
                            tracing::warn!(
                                "shift/reduce conflict in {:?} on `{}': reduce by `{}' replaces shift({:?})",
                                id,
                                g.terminals[&t],
                                production.display(g),
                                shift,
                            );
                            conflicts.push(Conflict {
                                state: *id,
                                terminal: t,
                                shift,
                                reduce: production.id(),
                            });
                        }
                    }
                }
            }

            actions.insert(*id, row);
        }

        tracing::debug!(
            states = actions.len(),
            conflicts = conflicts.len(),
            "parse table compiled"
        );

        Self {
            actions,
            gotos,
            conflicts,
        }
    }

    pub fn action(&self, state: StateID, terminal: TerminalID) -> Option<Movement> {
        self.actions.get(&state)?.get(&terminal).copied()
    }

    pub fn goto(&self, state: StateID, nonterminal: NonterminalID) -> Option<Movement> {
        self.gotos.get(&state)?.get(&nonterminal).copied()
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_fn(move |f| {
            for (i, (id, row)) in self.actions.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }

                writeln!(f, "#### State {:?}", id)?;
                writeln!(f, "## actions")?;
                for (t, movement) in row {
                    let t = &g.terminals[t];
                    match movement {
                        Movement::Reduce(p) => {
                            writeln!(f, "- {} => reduce({})", t, g.production(*p).display(g))?
                        }
                        movement => writeln!(f, "- {} => {}", t, movement)?,
                    }
                }

                if let Some(gotos) = self.gotos.get(id).filter(|gotos| !gotos.is_empty()) {
                    writeln!(f, "## gotos")?;
                    for (n, movement) in gotos {
                        writeln!(f, "- {} => {}", g.nonterminals[n], movement)?;
                    }
                }
            }

            if !self.conflicts.is_empty() {
                writeln!(f, "\n## conflicts")?;
                for conflict in &self.conflicts {
                    writeln!(
                        f,
                        "- {:?} on {}: shift({:?}) replaced by reduce({})",
                        conflict.state,
                        g.terminals[&conflict.terminal],
                        conflict.shift,
                        g.production(conflict.reduce).display(g),
                    )?;
                }
            }
            Ok(())
        })
    }
}
