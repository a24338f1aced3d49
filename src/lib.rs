//! A plain LL(1) toolkit: grammars, FIRST/FOLLOW sets, the predictive
//! table and a recovering table-driven parser, plus a grammar-driven
//! scanner so a source text can be analyzed in one call.
//!
//! ```
//! use llano::{analyze, LlTable};
//!
//! let grammar = llano::minijava::grammar()?;
//! let table = LlTable::build(&grammar)?;
//!
//! let analysis = analyze("class A { int x; }", &grammar, &table);
//! assert!(analysis.lexical_errors.is_empty());
//! assert!(analysis.syntax_errors.is_empty());
//! # Ok::<(), llano::LlanoError>(())
//! ```

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod ll;
pub mod minijava;
pub mod report;
pub mod rule;
pub mod symbol;
pub mod token;

pub use ast::{Node, NodeId, ParseTree};
pub use error::{ErrorKind, LexicalError, LlanoError, SyntaxError};
pub use grammar::Grammar;
pub use lexer::{Scanner, Span};
pub use ll::{analyze, Analysis, FirstSets, FollowSets, LlParser, LlTable};
pub use rule::{Rule, RuleDef, RuleId, RuleSet};
pub use symbol::{Symbol, SymbolKind, EOS, EPSILON};
pub use token::Token;

pub mod traits {
    pub use crate::symbol::traits::SymbolSlice;
}

pub type LlanoResult<T> = Result<T, LlanoError>;

#[cfg(test)]
pub mod fixtures {
    use crate::{Grammar, LlanoResult};

    /// The textbook expression grammar, right-factored.
    pub fn fixture_expr_grammar() -> LlanoResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("+")?
            .add_terminal_symbol("*")?
            .add_terminal_symbol("(")?
            .add_terminal_symbol(")")?
            .add_identifier_terminal("id")?
            .add_non_terminal_symbol("E")?
            .add_non_terminal_symbol("E'")?
            .add_non_terminal_symbol("T")?
            .add_non_terminal_symbol("T'")?
            .add_non_terminal_symbol("F")?;

        grammar
            .add_rule("E", ["T", "E'"])?
            .add_rule("E'", ["+", "T", "E'"])?
            .add_rule("E'", [])?
            .add_rule("T", ["F", "T'"])?
            .add_rule("T'", ["*", "F", "T'"])?
            .add_rule("T'", [])?
            .add_rule("F", ["(", "E", ")"])?
            .add_rule("F", ["id"])?
            .set_start_symbol("E")?;

        Ok(grammar)
    }

    /// Immediate left recursion on E.
    pub fn fixture_left_recursive_grammar() -> LlanoResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("0")?
            .add_terminal_symbol("1")?
            .add_terminal_symbol("*")?
            .add_terminal_symbol("+")?
            .add_non_terminal_symbol("E")?
            .add_non_terminal_symbol("B")?;

        grammar
            .add_rule("E", ["E", "*", "B"])?
            .add_rule("E", ["E", "+", "B"])?
            .add_rule("E", ["B"])?
            .add_rule("B", ["0"])?
            .add_rule("B", ["1"])?
            .set_start_symbol("E")?;

        Ok(grammar)
    }

    /// FIRST/FIRST conflict: both alternatives of S start with x.
    pub fn fixture_conflicting_grammar() -> LlanoResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("x")?
            .add_non_terminal_symbol("S")?
            .add_non_terminal_symbol("A")?
            .add_non_terminal_symbol("B")?;

        grammar
            .add_rule("S", ["A"])?
            .add_rule("S", ["B"])?
            .add_rule("A", ["x"])?
            .add_rule("B", ["x"])?
            .set_start_symbol("S")?;

        Ok(grammar)
    }
}
