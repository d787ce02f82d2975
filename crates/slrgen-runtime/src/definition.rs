//! Parser definition.

use std::fmt;

/// The trait for abstracting a compiled SLR parse table.
///
/// A generated parser implements this trait over its embedded tables, and
/// `slrgen` implements it over the tables it compiled in memory.
pub trait ParseDef {
    /// The number to identify the state of the LR automaton.
    type State: Copy + PartialEq + fmt::Debug;

    /// The number to identify the terminal symbols.
    type Terminal: Copy + PartialEq + fmt::Debug;

    /// The number to identify the nonterminal symbols.
    type Nonterminal: Copy + PartialEq + fmt::Debug;

    /// The number to identify the production rules.
    type Production: Copy + fmt::Debug;

    /// Return the initial state number.
    fn initial_state(&self) -> Self::State;

    /// Return the terminal symbol that marks the end of input.
    fn end_of_input(&self) -> Self::Terminal;

    /// Translate a lexer token kind into the corresponding terminal symbol.
    fn terminal(&self, kind: usize) -> Option<Self::Terminal>;

    /// Return whether tokens of the specified kind must never reach the parser.
    fn is_ignored(&self, kind: usize) -> bool;

    /// Look up the action table.
    fn action(
        &self,
        current: Self::State,
        lookahead: Self::Terminal,
    ) -> Option<Movement<Self::State, Self::Production>>;

    /// Look up the goto table.
    fn goto(
        &self,
        current: Self::State,
        symbol: Self::Nonterminal,
    ) -> Option<Movement<Self::State, Self::Production>>;

    /// Return the head symbol and the body length of a production.
    fn production(&self, production: Self::Production) -> (Self::Nonterminal, usize);
}

impl<T: ?Sized> ParseDef for &T
where
    T: ParseDef,
{
    type State = T::State;
    type Terminal = T::Terminal;
    type Nonterminal = T::Nonterminal;
    type Production = T::Production;

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn end_of_input(&self) -> Self::Terminal {
        (**self).end_of_input()
    }

    fn terminal(&self, kind: usize) -> Option<Self::Terminal> {
        (**self).terminal(kind)
    }

    fn is_ignored(&self, kind: usize) -> bool {
        (**self).is_ignored(kind)
    }

    fn action(
        &self,
        current: Self::State,
        lookahead: Self::Terminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).action(current, lookahead)
    }

    fn goto(
        &self,
        current: Self::State,
        symbol: Self::Nonterminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).goto(current, symbol)
    }

    fn production(&self, production: Self::Production) -> (Self::Nonterminal, usize) {
        (**self).production(production)
    }
}

impl<T: ?Sized> ParseDef for std::rc::Rc<T>
where
    T: ParseDef,
{
    type State = T::State;
    type Terminal = T::Terminal;
    type Nonterminal = T::Nonterminal;
    type Production = T::Production;

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn end_of_input(&self) -> Self::Terminal {
        (**self).end_of_input()
    }

    fn terminal(&self, kind: usize) -> Option<Self::Terminal> {
        (**self).terminal(kind)
    }

    fn is_ignored(&self, kind: usize) -> bool {
        (**self).is_ignored(kind)
    }

    fn action(
        &self,
        current: Self::State,
        lookahead: Self::Terminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).action(current, lookahead)
    }

    fn goto(
        &self,
        current: Self::State,
        symbol: Self::Nonterminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).goto(current, symbol)
    }

    fn production(&self, production: Self::Production) -> (Self::Nonterminal, usize) {
        (**self).production(production)
    }
}

impl<T: ?Sized> ParseDef for std::sync::Arc<T>
where
    T: ParseDef,
{
    type State = T::State;
    type Terminal = T::Terminal;
    type Nonterminal = T::Nonterminal;
    type Production = T::Production;

    fn initial_state(&self) -> Self::State {
        (**self).initial_state()
    }

    fn end_of_input(&self) -> Self::Terminal {
        (**self).end_of_input()
    }

    fn terminal(&self, kind: usize) -> Option<Self::Terminal> {
        (**self).terminal(kind)
    }

    fn is_ignored(&self, kind: usize) -> bool {
        (**self).is_ignored(kind)
    }

    fn action(
        &self,
        current: Self::State,
        lookahead: Self::Terminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).action(current, lookahead)
    }

    fn goto(
        &self,
        current: Self::State,
        symbol: Self::Nonterminal,
    ) -> Option<Movement<Self::State, Self::Production>> {
        (**self).goto(current, symbol)
    }

    fn production(&self, production: Self::Production) -> (Self::Nonterminal, usize) {
        (**self).production(production)
    }
}

/// An entry of the action or goto table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement<TState, TProduction> {
    /// Consume the lookahead token and push the specified state.
    Shift(TState),

    /// Pop the body of the specified production and push its head.
    Reduce(TProduction),

    /// Push the specified state after a nonterminal has been pushed.
    Goto(TState),

    /// The whole input has been recognized.
    Accept,
}

impl<TState, TProduction> fmt::Display for Movement<TState, TProduction>
where
    TState: fmt::Debug,
    TProduction: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shift(next) => write!(f, "shift({:?})", next),
            Self::Reduce(production) => write!(f, "reduce({:?})", production),
            Self::Goto(next) => write!(f, "goto({:?})", next),
            Self::Accept => f.write_str("accept"),
        }
    }
}
