//! Grammar definitions for integration tests.

use slrgen::grammar::{GrammarDef, GrammarDefError, SymbolID::*};

pub type Definition = fn(&mut GrammarDef) -> Result<(), GrammarDefError>;

/// All sample grammars with their names.
pub const ALL: &[(&str, Definition)] = &[
    ("sum", sum),
    ("var_decl", var_decl),
    ("arithmetic", arithmetic),
    ("list", list),
    ("ambiguous", ambiguous),
];

pub fn by_name(name: &str) -> Option<Definition> {
    ALL.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

/// `E -> E PLUS T | T ; T -> ID`
pub fn sum(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let id = g.terminal("ID")?;
    let plus = g.terminal("PLUS")?;

    let e = g.nonterminal("E")?;
    let t = g.nonterminal("T")?;

    g.rule(e, [N(e), T(plus), N(t)])?;
    g.rule(e, [N(t)])?;
    g.rule(t, [T(id)])?;

    Ok(())
}

/// One `let` statement per line.
pub fn var_decl(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    // declare terminal symbols.
    let let_ = g.terminal("LET")?;
    let id = g.terminal("ID")?;
    let assign = g.terminal("ASSIGN")?;
    let number = g.terminal("NUMBER")?;
    let plus = g.terminal("PLUS")?;
    let semicolon = g.terminal("SEMICOLON")?;
    g.terminal("NEWLINE")?;
    g.ignored_terminal("COMMENT")?;

    // declare nonterminal symbols.
    let stmt = g.nonterminal("STMT")?;
    let expr = g.nonterminal("EXPR")?;
    let term = g.nonterminal("TERM")?;

    g.rule(stmt, [T(let_), T(id), T(assign), N(expr), T(semicolon)])?;
    g.rule(expr, [N(expr), T(plus), N(term)])?;
    g.rule(expr, [N(term)])?;
    g.rule(term, [T(number)])?;
    g.rule(term, [T(id)])?;

    Ok(())
}

pub fn arithmetic(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    for name in [
        "LPAREN", "RPAREN", "PLUS", "MINUS", "STAR", "SLASH", "NUM", "NEWLINE",
    ] {
        g.terminal(name)?;
    }
    for name in ["EXPR", "FACTOR", "TERM"] {
        g.nonterminal(name)?;
    }

    g.rule_by_name("EXPR", &["EXPR", "PLUS", "FACTOR"])?;
    g.rule_by_name("EXPR", &["EXPR", "MINUS", "FACTOR"])?;
    g.rule_by_name("EXPR", &["FACTOR"])?;
    g.rule_by_name("FACTOR", &["FACTOR", "STAR", "TERM"])?;
    g.rule_by_name("FACTOR", &["FACTOR", "SLASH", "TERM"])?;
    g.rule_by_name("FACTOR", &["TERM"])?;
    g.rule_by_name("TERM", &["NUM"])?;
    g.rule_by_name("TERM", &["LPAREN", "EXPR", "RPAREN"])?;

    Ok(())
}

/// A bracketed list of items, possibly empty.
pub fn list(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let lbracket = g.terminal("LBRACKET")?;
    let rbracket = g.terminal("RBRACKET")?;
    let item = g.terminal("ITEM")?;

    let list = g.nonterminal("LIST")?;
    let items = g.nonterminal("ITEMS")?;

    g.start_symbol(list)?;

    g.rule(items, [N(items), T(item)])?;
    g.rule(items, [])?;
    g.rule(list, [T(lbracket), N(items), T(rbracket)])?;

    Ok(())
}

/// `E -> E PLUS E | NUM`, which has a shift/reduce conflict on `PLUS`.
pub fn ambiguous(g: &mut GrammarDef) -> Result<(), GrammarDefError> {
    let plus = g.terminal("PLUS")?;
    let num = g.terminal("NUM")?;

    let e = g.nonterminal("E")?;

    g.rule(e, [N(e), T(plus), N(e)])?;
    g.rule(e, [T(num)])?;

    Ok(())
}
