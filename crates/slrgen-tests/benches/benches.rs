use criterion::{criterion_group, criterion_main, Criterion};
use slrgen::{
    first_follow::{FirstSets, FollowSets},
    grammar::Grammar,
    lr0::LR0Automaton,
    table::ParseTable,
    SlrDefinition,
};
use slrgen_runtime::Parser;
use slrgen_tests::{grammars, tokenize};
use std::hint::black_box;

criterion_main!(benches);
criterion_group!(benches, bench_construction, bench_parse);

fn bench_construction(c: &mut Criterion) {
    for (name, f) in grammars::ALL {
        let grammar = Grammar::define(*f).unwrap();
        c.bench_function(&format!("lr0/{}", name), |b| {
            b.iter(|| {
                let _lr0 = black_box(LR0Automaton::build(&grammar));
            });
        });

        let lr0 = LR0Automaton::build(&grammar);
        let first = FirstSets::compute(&grammar);
        let follow = FollowSets::compute(&grammar, &first);
        c.bench_function(&format!("table/{}", name), |b| {
            b.iter(|| {
                let _table = black_box(ParseTable::compile(&lr0, &first, &follow, &grammar));
            });
        });
    }
}

fn bench_parse(c: &mut Criterion) {
    let grammar = Grammar::define(grammars::arithmetic).unwrap();
    let parser = Parser::new(SlrDefinition::new(&grammar));
    let source = "LPAREN NUM PLUS NUM RPAREN STAR NUM MINUS NUM SLASH NUM PLUS ".repeat(64);
    let tokens = tokenize(&grammar, &format!("{}NUM", source)).unwrap();
    c.bench_function("parse/arithmetic", |b| {
        b.iter(|| {
            let outcome = parser.parse(black_box(&tokens));
            assert!(outcome.accepted);
        });
    });
}
