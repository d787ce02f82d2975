//! In-memory parser definition backed by a compiled table.

use crate::{
    first_follow::{FirstSets, FollowSets},
    grammar::{Grammar, NonterminalID, ProductionID, TerminalID},
    lr0::{LR0Automaton, StateID},
    table::{Movement, ParseTable},
};
use slrgen_runtime::ParseDef;

/// The compiled artifact of a grammar, consumable by the runtime parser.
#[derive(Debug)]
pub struct SlrDefinition<'g> {
    grammar: &'g Grammar,
    table: ParseTable,
}

impl<'g> SlrDefinition<'g> {
    /// Run the whole construction pipeline on the specified grammar.
    pub fn new(grammar: &'g Grammar) -> Self {
        let lr0 = LR0Automaton::build(grammar);
        let first = FirstSets::compute(grammar);
        let follow = FollowSets::compute(grammar, &first);
        let table = ParseTable::compile(&lr0, &first, &follow, grammar);
        Self { grammar, table }
    }

    pub fn from_table(grammar: &'g Grammar, table: ParseTable) -> Self {
        Self { grammar, table }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }
}

impl ParseDef for SlrDefinition<'_> {
    type State = StateID;
    type Terminal = TerminalID;
    type Nonterminal = NonterminalID;
    type Production = ProductionID;

    fn initial_state(&self) -> StateID {
        StateID::ROOT
    }

    fn end_of_input(&self) -> TerminalID {
        TerminalID::EOI
    }

    fn terminal(&self, kind: usize) -> Option<TerminalID> {
        self.grammar.terminal_by_kind(kind)
    }

    fn is_ignored(&self, kind: usize) -> bool {
        self.grammar
            .terminal_by_kind(kind)
            .map_or(false, |t| self.grammar.terminals[&t].is_ignored())
    }

    fn action(&self, current: StateID, lookahead: TerminalID) -> Option<Movement> {
        self.table.action(current, lookahead)
    }

    fn goto(&self, current: StateID, symbol: NonterminalID) -> Option<Movement> {
        self.table.goto(current, symbol)
    }

    fn production(&self, production: ProductionID) -> (NonterminalID, usize) {
        let production = self.grammar.production(production);
        (production.head(), production.body().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slrgen_runtime::{Lexeme, Parser};

    fn sum_grammar() -> Grammar {
        Grammar::define(|g| {
            g.terminal("ID")?;
            g.terminal("PLUS")?;
            g.nonterminal("E")?;
            g.nonterminal("T")?;
            g.rule_by_name("E", &["E", "PLUS", "T"])?;
            g.rule_by_name("E", &["T"])?;
            g.rule_by_name("T", &["ID"])?;
            Ok(())
        })
        .unwrap()
    }

    fn var_decl_grammar() -> Grammar {
        Grammar::define(|g| {
            g.terminal("LET")?;
            g.terminal("ID")?;
            g.terminal("ASSIGN")?;
            g.terminal("NUMBER")?;
            g.terminal("SEMICOLON")?;
            g.nonterminal("S")?;
            g.nonterminal("E")?;
            g.rule_by_name("S", &["LET", "ID", "ASSIGN", "E", "SEMICOLON"])?;
            g.rule_by_name("E", &["NUMBER"])?;
            g.rule_by_name("E", &["ID"])?;
            Ok(())
        })
        .unwrap()
    }

    /// Build tokens from terminal names, one byte offset apart.
    fn tokens(g: &Grammar, names: &[&str]) -> Vec<Lexeme> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let kind = g
                    .terminals
                    .values()
                    .find(|t| t.name() == *name)
                    .and_then(|t| t.id().kind())
                    .unwrap();
                Lexeme::new(*name, kind, i * 2)
            })
            .collect()
    }

    #[test]
    fn accepts_sum() {
        let g = sum_grammar();
        let parser = Parser::new(SlrDefinition::new(&g));
        let input = tokens(&g, &["ID", "PLUS", "ID"]);
        let outcome = parser.parse(&input);
        assert!(outcome.accepted);
        assert!(outcome.remainder.is_empty());
    }

    #[test]
    fn rejects_missing_operand() {
        let g = sum_grammar();
        let parser = Parser::new(SlrDefinition::new(&g));
        let input = tokens(&g, &["ID", "PLUS"]);
        let outcome = parser.parse(&input);
        assert!(!outcome.accepted);
        assert!(outcome.remainder.is_empty());
        // the second operand was expected right after `PLUS`
        assert_eq!(outcome.error_span(), Some((6, 6)));
    }

    #[test]
    fn var_decl() {
        let g = var_decl_grammar();
        let parser = Parser::new(SlrDefinition::new(&g));

        let input = tokens(&g, &["LET", "ID", "ASSIGN", "NUMBER", "SEMICOLON"]);
        assert!(parser.parse(&input).accepted);

        let input = tokens(&g, &["LET", "ID", "NUMBER", "SEMICOLON"]);
        let outcome = parser.parse(&input);
        assert!(!outcome.accepted);
        let rest: Vec<_> = outcome.remainder.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(rest, ["NUMBER", "SEMICOLON"]);
        assert_eq!(outcome.error_span(), Some((4, 6)));
    }

    #[test]
    fn ignored_kinds() {
        let g = Grammar::define(|g| {
            g.terminal("A")?;
            g.ignored_terminal("WS")?;
            g.nonterminal("S")?;
            g.rule_by_name("S", &["A"])?;
            Ok(())
        })
        .unwrap();
        let def = SlrDefinition::new(&g);
        assert!(!def.is_ignored(0));
        assert!(def.is_ignored(1));
        assert!(!def.is_ignored(2));
        assert_eq!(def.terminal(2), None);
    }
}
