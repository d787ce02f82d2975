//! Calculation of FIRST and FOLLOW sets.
//!
//! Only the leading symbol of a production contributes to FIRST; nullable
//! prefixes are not looked through.

use crate::{
    grammar::{Grammar, NonterminalID, SymbolID, TerminalID},
    types::Map,
    util::display_fn,
};
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TerminalSet {
    inner: bit_set::BitSet,
}

impl TerminalSet {
    pub fn contains(&self, id: TerminalID) -> bool {
        self.inner.contains(id.into_raw().into())
    }

    pub fn insert(&mut self, id: TerminalID) -> bool {
        self.inner.insert(id.into_raw().into())
    }

    /// Add all elements of `other`, returning whether this set grew.
    pub fn union_with(&mut self, other: &Self) -> bool {
        let len = self.inner.len();
        self.inner.union_with(&other.inner);
        self.inner.len() != len
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = TerminalID> + '_ {
        self.inner
            .iter()
            .map(|raw| raw.try_into().map(TerminalID::from_raw).unwrap())
    }
}

impl FromIterator<TerminalID> for TerminalSet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = TerminalID>,
    {
        Self {
            inner: iter.into_iter().map(|t| t.into_raw().into()).collect(),
        }
    }
}

fn display_sets<'g>(
    label: &'static str,
    sets: &'g Map<NonterminalID, TerminalSet>,
    g: &'g Grammar,
) -> impl fmt::Display + 'g {
    display_fn(move |f| {
        for (n, set) in sets {
            write!(f, "{}({}) = {{", label, g.nonterminals[n])?;
            for t in set.iter() {
                write!(f, " {}", g.terminals[&t])?;
            }
            writeln!(f, " }}")?;
        }
        Ok(())
    })
}

/// FIRST sets of every nonterminal symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstSets {
    sets: Map<NonterminalID, TerminalSet>,
}

impl FirstSets {
    /// Iterate over the grammar until no set changes.
    pub fn compute(g: &Grammar) -> Self {
        let mut first = Self {
            sets: g
                .nonterminals
                .keys()
                .map(|n| (*n, TerminalSet::default()))
                .collect(),
        };
        let mut passes = 1;
        while first.propagate(g) {
            passes += 1;
        }
        tracing::debug!(passes, "FIRST sets converged");
        first
    }

    /// Perform a single pass over all productions.
    ///
    /// Returns whether any set changed.
    pub fn propagate(&mut self, g: &Grammar) -> bool {
        let mut changed = false;
        for production in g.productions.values() {
            let head = production.head();
            match production.body().first() {
                Some(SymbolID::T(t)) => {
                    changed |= self.sets[&head].insert(*t);
                }
                Some(SymbolID::N(n)) if *n != head => {
                    let leading = self.sets[n].clone();
                    changed |= self.sets[&head].union_with(&leading);
                }
                _ => (),
            }
        }
        changed
    }

    pub fn get(&self, n: NonterminalID) -> &TerminalSet {
        &self.sets[&n]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NonterminalID, &TerminalSet)> + '_ {
        self.sets.iter().map(|(n, set)| (*n, set))
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_sets("FIRST", &self.sets, g)
    }
}

/// FOLLOW sets of every nonterminal symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowSets {
    sets: Map<NonterminalID, TerminalSet>,
}

impl FollowSets {
    pub fn compute(g: &Grammar, first: &FirstSets) -> Self {
        let mut sets: Map<NonterminalID, TerminalSet> = g
            .nonterminals
            .keys()
            .map(|n| (*n, TerminalSet::default()))
            .collect();
        // the augmenting production carries `$` over to the start symbol.
        sets[&NonterminalID::START].insert(TerminalID::EOI);

        let mut follow = Self { sets };
        let mut passes = 1;
        while follow.propagate(g, first) {
            passes += 1;
        }
        tracing::debug!(passes, "FOLLOW sets converged");
        follow
    }

    /// Perform a single pass over all productions.
    ///
    /// Returns whether any set changed.
    pub fn propagate(&mut self, g: &Grammar, first: &FirstSets) -> bool {
        let mut changed = false;
        for production in g.productions.values() {
            let body = production.body();
            for (i, symbol) in body.iter().enumerate() {
                let b = match symbol {
                    SymbolID::N(b) => *b,
                    SymbolID::T(..) => continue,
                };
                match body.get(i + 1) {
                    Some(SymbolID::T(t)) => {
                        changed |= self.sets[&b].insert(*t);
                    }
                    Some(SymbolID::N(next)) => {
                        changed |= self.sets[&b].union_with(first.get(*next));
                    }
                    None if b != production.head() => {
                        let head = self.sets[&production.head()].clone();
                        changed |= self.sets[&b].union_with(&head);
                    }
                    None => (),
                }
            }
        }
        changed
    }

    pub fn get(&self, n: NonterminalID) -> &TerminalSet {
        &self.sets[&n]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NonterminalID, &TerminalSet)> + '_ {
        self.sets.iter().map(|(n, set)| (*n, set))
    }

    pub fn display<'g>(&'g self, g: &'g Grammar) -> impl fmt::Display + 'g {
        display_sets("FOLLOW", &self.sets, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SymbolID::*;

    fn expr_grammar() -> Grammar {
        Grammar::define(|g| {
            let plus = g.terminal("PLUS")?;
            let star = g.terminal("STAR")?;
            let lparen = g.terminal("LPAREN")?;
            let rparen = g.terminal("RPAREN")?;
            let id = g.terminal("ID")?;

            let e = g.nonterminal("E")?;
            let t = g.nonterminal("T")?;
            let f = g.nonterminal("F")?;

            g.rule(e, [N(e), T(plus), N(t)])?;
            g.rule(e, [N(t)])?;
            g.rule(t, [N(t), T(star), N(f)])?;
            g.rule(t, [N(f)])?;
            g.rule(f, [T(lparen), N(e), T(rparen)])?;
            g.rule(f, [T(id)])?;
            Ok(())
        })
        .unwrap()
    }

    fn names(g: &Grammar, set: &TerminalSet) -> Vec<String> {
        let mut names: Vec<_> = set.iter().map(|t| g.terminals[&t].name().to_owned()).collect();
        names.sort();
        names
    }

    fn nonterminal(g: &Grammar, name: &str) -> NonterminalID {
        match g.symbol_by_name(name) {
            Some(N(n)) => n,
            _ => panic!("no nonterminal {}", name),
        }
    }

    #[test]
    fn first_sets() {
        let g = expr_grammar();
        let first = FirstSets::compute(&g);
        for name in ["E", "T", "F"] {
            let n = nonterminal(&g, name);
            assert_eq!(names(&g, first.get(n)), ["ID", "LPAREN"], "FIRST({})", name);
        }
        assert_eq!(names(&g, first.get(NonterminalID::START)), ["ID", "LPAREN"]);
    }

    #[test]
    fn follow_sets() {
        let g = expr_grammar();
        let first = FirstSets::compute(&g);
        let follow = FollowSets::compute(&g, &first);
        eprintln!("{}", follow.display(&g));

        let e = nonterminal(&g, "E");
        let t = nonterminal(&g, "T");
        let f = nonterminal(&g, "F");
        assert_eq!(names(&g, follow.get(e)), ["$", "PLUS", "RPAREN"]);
        assert_eq!(names(&g, follow.get(t)), ["$", "PLUS", "RPAREN", "STAR"]);
        assert_eq!(names(&g, follow.get(f)), ["$", "PLUS", "RPAREN", "STAR"]);
    }

    #[test]
    fn fixed_point_is_idempotent() {
        let g = expr_grammar();
        let mut first = FirstSets::compute(&g);
        let snapshot = first.clone();
        assert!(!first.propagate(&g));
        assert_eq!(first, snapshot);

        let mut follow = FollowSets::compute(&g, &first);
        let snapshot = follow.clone();
        assert!(!follow.propagate(&g, &first));
        assert_eq!(follow, snapshot);
    }

    #[test]
    fn nullable_prefix_is_not_looked_through() {
        // S -> A B ; A -> ; B -> b
        let g = Grammar::define(|g| {
            let b_tok = g.terminal("b")?;
            let s = g.nonterminal("S")?;
            let a = g.nonterminal("A")?;
            let b = g.nonterminal("B")?;
            g.rule(s, [N(a), N(b)])?;
            g.rule(a, [])?;
            g.rule(b, [T(b_tok)])?;
            Ok(())
        })
        .unwrap();
        let first = FirstSets::compute(&g);
        assert!(first.get(nonterminal(&g, "A")).is_empty());
        assert!(first.get(nonterminal(&g, "S")).is_empty());
        assert_eq!(names(&g, first.get(nonterminal(&g, "B"))), ["b"]);

        let follow = FollowSets::compute(&g, &first);
        assert_eq!(names(&g, follow.get(nonterminal(&g, "A"))), ["b"]);
        assert_eq!(names(&g, follow.get(nonterminal(&g, "B"))), ["$"]);
    }
}
