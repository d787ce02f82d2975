use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use slrgen::{grammar::Grammar, lr0::LR0Automaton, SlrDefinition};
use slrgen_runtime::LineDriver;
use slrgen_tests::{grammars, terminal_kind, tokenize};
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SampleGrammar {
    Sum,
    VarDecl,
    Arithmetic,
    List,
    Ambiguous,
}

impl SampleGrammar {
    fn definition(self) -> grammars::Definition {
        match self {
            Self::Sum => grammars::sum,
            Self::VarDecl => grammars::var_decl,
            Self::Arithmetic => grammars::arithmetic,
            Self::List => grammars::list,
            Self::Ambiguous => grammars::ambiguous,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Dump {
    Grammar,
    Automaton,
    Table,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The built-in grammar used to parse the input.
    #[arg(short, long, value_enum, default_value_t = SampleGrammar::VarDecl)]
    grammar: SampleGrammar,

    /// Print the intermediate results of the construction.
    #[arg(long, value_enum)]
    dump: Vec<Dump>,

    /// The name of the terminal that separates logical lines.
    #[arg(long, default_value = slrgen_tests::NEWLINE)]
    newline: String,

    /// The path of the input file, a sequence of whitespace-separated
    /// terminal names.
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::trace!("CLI args = {:?}", args);

    let grammar = Grammar::define(args.grammar.definition())
        .with_context(|| format!("failed to define the grammar {:?}", args.grammar))?;
    let definition = SlrDefinition::new(&grammar);

    for dump in &args.dump {
        match dump {
            Dump::Grammar => println!("{}", grammar),
            Dump::Automaton => println!("{}", LR0Automaton::build(&grammar).display(&grammar)),
            Dump::Table => println!("{}", definition.table().display(&grammar)),
        }
    }

    let num_conflicts = definition.table().conflicts.len();
    if num_conflicts > 0 {
        let suffix = if num_conflicts == 1 { "" } else { "s" };
        println!(
            "[warning] The parse table has {} shift/reduce conflict{}. Reductions take precedence.",
            num_conflicts, suffix
        );
    }

    let input = match &args.input {
        Some(input) => input,
        None => return Ok(()),
    };
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read the input file {}", input.display()))?;
    let tokens = tokenize(&grammar, &source).context("failed to tokenize the input")?;

    let mut driver = LineDriver::new(slrgen_runtime::Parser::new(&definition));
    match terminal_kind(&grammar, &args.newline) {
        Some(kind) => driver = driver.newline_kind(kind),
        None => tracing::debug!("no terminal `{}'; parsing the input at once", args.newline),
    }

    let report = driver.run(&tokens);
    for error in &report.errors {
        println!("{}", error);
    }
    if !report.is_ok() {
        anyhow::bail!(
            "{} of {} statements rejected",
            report.errors.len(),
            report.errors.len() + report.accepted
        );
    }
    println!("accepted {} statements", report.accepted);

    Ok(())
}
