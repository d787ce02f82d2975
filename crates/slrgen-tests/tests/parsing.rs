use slrgen::{grammar::Grammar, SlrDefinition};
use slrgen_runtime::{LineDriver, Parser, SyntaxError};
use slrgen_tests::{grammars, terminal_kind, tokenize, NEWLINE};

fn grammar(name: &str) -> Grammar {
    let f = grammars::by_name(name).unwrap();
    Grammar::define(f).unwrap()
}

#[test]
fn sum_accepts_valid_derivation() {
    let g = grammar("sum");
    let parser = Parser::new(SlrDefinition::new(&g));
    for source in ["ID", "ID PLUS ID", "ID PLUS ID PLUS ID"] {
        let tokens = tokenize(&g, source).unwrap();
        let outcome = parser.parse(&tokens);
        assert!(outcome.accepted, "{}", source);
        assert!(outcome.remainder.is_empty(), "{}", source);
    }
}

#[test]
fn sum_rejects_missing_operand() {
    let g = grammar("sum");
    let parser = Parser::new(SlrDefinition::new(&g));
    let tokens = tokenize(&g, "ID PLUS").unwrap();
    let outcome = parser.parse(&tokens);
    assert!(!outcome.accepted);
    assert!(outcome.remainder.is_empty());
    assert_eq!(outcome.error_span(), Some((7, 7)));
}

#[test]
fn rejection_is_immediate_on_table_gap() {
    let g = grammar("sum");
    let parser = Parser::new(SlrDefinition::new(&g));
    let tokens = tokenize(&g, "PLUS ID").unwrap();
    let outcome = parser.parse(&tokens);
    assert!(!outcome.accepted);
    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.remainder, &tokens[..]);
    assert_eq!(outcome.error_span(), Some((0, 5)));
}

#[test]
fn var_decl_statement() {
    let g = grammar("var_decl");
    let parser = Parser::new(SlrDefinition::new(&g));

    let tokens = tokenize(&g, "LET ID ASSIGN NUMBER SEMICOLON").unwrap();
    assert!(parser.parse(&tokens).accepted);

    let tokens = tokenize(&g, "LET ID NUMBER SEMICOLON").unwrap();
    let outcome = parser.parse(&tokens);
    assert!(!outcome.accepted);
    let rest: Vec<_> = outcome.remainder.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(rest, ["NUMBER", "SEMICOLON"]);
    assert_eq!(outcome.error_span(), Some((7, 14)));
}

#[test]
fn arithmetic_expressions() {
    let g = grammar("arithmetic");
    let parser = Parser::new(SlrDefinition::new(&g));

    for source in [
        "NUM",
        "NUM PLUS NUM STAR NUM",
        "LPAREN NUM MINUS NUM RPAREN SLASH NUM",
        "LPAREN LPAREN NUM RPAREN RPAREN",
    ] {
        let tokens = tokenize(&g, source).unwrap();
        assert!(parser.parse(&tokens).accepted, "{}", source);
    }

    let tokens = tokenize(&g, "NUM PLUS PLUS NUM").unwrap();
    let outcome = parser.parse(&tokens);
    assert!(!outcome.accepted);
    assert_eq!(outcome.remainder, &tokens[2..]);

    let tokens = tokenize(&g, "LPAREN NUM").unwrap();
    let outcome = parser.parse(&tokens);
    assert!(!outcome.accepted);
    assert!(outcome.remainder.is_empty());
}

#[test]
fn empty_production() {
    let g = grammar("list");
    let parser = Parser::new(SlrDefinition::new(&g));

    for source in ["LBRACKET RBRACKET", "LBRACKET ITEM ITEM ITEM RBRACKET"] {
        let tokens = tokenize(&g, source).unwrap();
        assert!(parser.parse(&tokens).accepted, "{}", source);
    }

    let tokens = tokenize(&g, "LBRACKET ITEM").unwrap();
    assert!(!parser.parse(&tokens).accepted);
}

#[test]
fn conflicting_grammar_reduces_eagerly() {
    let g = grammar("ambiguous");
    let parser = Parser::new(SlrDefinition::new(&g));
    let tokens = tokenize(&g, "NUM PLUS NUM PLUS NUM").unwrap();
    assert!(parser.parse(&tokens).accepted);
}

#[test]
fn unknown_word() {
    let g = grammar("sum");
    let err = tokenize(&g, "ID PLUS X").unwrap_err();
    assert_eq!(err.offset, 8);
    assert_eq!(err.to_string(), "unknown terminal `X' at offset 8");
}

#[test]
fn driver_resynchronizes_per_line() {
    let g = grammar("var_decl");
    let newline = terminal_kind(&g, NEWLINE).unwrap();
    let driver = LineDriver::new(Parser::new(SlrDefinition::new(&g))).newline_kind(newline);

    let source = "\
LET ID ASSIGN NUMBER SEMICOLON
LET ID ASSIGN ID PLUS
  NUMBER SEMICOLON
LET ID NUMBER SEMICOLON COMMENT
LET ID ASSIGN NUMBER SEMICOLON
";
    let tokens = tokenize(&g, source).unwrap();
    let report = driver.run(&tokens);

    let bad_line = source.find("LET ID NUMBER").unwrap();
    assert_eq!(report.accepted, 3);
    assert_eq!(
        report.errors,
        vec![SyntaxError {
            start: bad_line + 7,
            end: bad_line + 14,
        }]
    );
}

#[test]
fn driver_reports_unfinished_program() {
    let g = grammar("arithmetic");
    let newline = terminal_kind(&g, NEWLINE).unwrap();
    let driver = LineDriver::new(Parser::new(SlrDefinition::new(&g))).newline_kind(newline);

    let source = "NUM PLUS NUM\nLPAREN NUM";
    let tokens = tokenize(&g, source).unwrap();
    let report = driver.run(&tokens);
    assert_eq!(report.accepted, 1);
    assert_eq!(
        report.errors,
        vec![SyntaxError {
            start: source.len(),
            end: source.len(),
        }]
    );
    assert_eq!(
        report.errors[0].to_string(),
        format!("ERROR PARSING FROM {0} to {0}", source.len())
    );
}

#[test]
fn shared_definition() {
    let g = grammar("arithmetic");
    let def = SlrDefinition::new(&g);
    let inputs = [
        "NUM PLUS NUM",
        "LPAREN NUM RPAREN STAR NUM",
        "NUM SLASH NUM MINUS NUM",
        "NUM NUM",
    ];
    let results: Vec<bool> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|source| {
                let parser = Parser::new(&def);
                let g = &g;
                s.spawn(move || {
                    let tokens = tokenize(g, source).unwrap();
                    parser.parse(&tokens).accepted
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(results, [true, true, true, false]);
}
