//! LL(1) table construction and table-driven parsing.

mod sets;
mod table;

pub use sets::{FirstSets, FollowSets};
pub use table::LlTable;

use itertools::Itertools as _;

use crate::ast::{NodeId, ParseTree};
use crate::error::{LexicalError, SyntaxError};
use crate::grammar::Grammar;
use crate::lexer::{Scanner, Span};
use crate::symbol::{Symbol, EOS};
use crate::token::Token;

/// A table-driven predictive parser.
///
/// Runs the explicit-stack LL(1) loop over a token stream and builds
/// the derivation tree as it expands. Parsing never aborts: syntax
/// errors are recorded and recovered from in panic mode, so a single
/// pass reports every error the table can see.
pub struct LlParser<'sid, 'sym, 'table> {
    table: &'table LlTable<'sid, 'sym>,
}

impl<'sid, 'sym, 'table> LlParser<'sid, 'sym, 'table> {
    pub fn new(table: &'table LlTable<'sid, 'sym>) -> Self {
        Self { table }
    }

    /// Parses a token stream into a derivation tree.
    ///
    /// Always returns a tree; when the input is erroneous the tree
    /// covers what was actually matched. Recovery drops input up to
    /// the next terminal in FOLLOW of the offending non-terminal. An
    /// input that ends too early yields a single error, and so does
    /// input left over once the start symbol is fully derived.
    pub fn parse<I>(&self, tokens: I) -> (ParseTree<'sid>, Vec<SyntaxError<'sid>>)
    where
        I: IntoIterator<Item = Token<'sid>>,
    {
        let start = self.table.start();
        let mut tree = ParseTree::new(start);
        let mut errors: Vec<SyntaxError<'sid>> = Vec::new();

        let mut input = tokens.into_iter();
        let mut cursor = input.next();
        let mut last_span = Span::default();

        // Each frame pairs a symbol to derive with its node in the tree.
        let mut stack: Vec<(Symbol<'sid>, NodeId)> = vec![(start, tree.root())];

        while let Some((symbol, node)) = stack.pop() {
            if symbol.is_terminal() {
                let matched = cursor
                    .as_ref()
                    .is_some_and(|token| token.kind == symbol.id);

                if matched {
                    if let Some(token) = cursor.take() {
                        last_span = token.location;
                        tree.fill(node, token);
                    }
                    cursor = input.next();
                } else if let Some(token) = &cursor {
                    // Mismatched terminal: report, drop the frame and
                    // retry the same token against the rest of the
                    // stack.
                    errors.push(SyntaxError {
                        span: token.location,
                        expected: vec![symbol.id],
                        found: Some(token.clone()),
                    });
                } else {
                    errors.push(SyntaxError {
                        span: last_span,
                        expected: vec![symbol.id],
                        found: None,
                    });
                    return (tree, errors);
                }

                continue;
            }

            let Some(token) = &cursor else {
                errors.push(SyntaxError {
                    span: last_span,
                    expected: self.expected(&symbol),
                    found: None,
                });
                return (tree, errors);
            };

            match self.table.rule(&symbol, token.kind) {
                Some(rule_id) => {
                    let rule = self.table.rules().borrow_rule(rule_id);

                    // Allocate the whole right hand side, ε leaves
                    // included, then derive it left to right.
                    let children: Vec<NodeId> = rule
                        .rhs
                        .iter()
                        .map(|&sym| tree.push_child(node, sym))
                        .collect();

                    for (&sym, child) in rule.rhs.iter().zip(children).rev() {
                        if !sym.is_epsilon() {
                            stack.push((sym, child));
                        }
                    }
                }
                None => {
                    errors.push(SyntaxError {
                        span: token.location,
                        expected: self.expected(&symbol),
                        found: Some(token.clone()),
                    });

                    // Panic mode: the non-terminal is already popped,
                    // drop input until FOLLOW(symbol) synchronizes.
                    let follow = self.table.follow().follow(&symbol);
                    while let Some(token) = &cursor {
                        if follow.iter().any(|sym| sym.id == token.kind) {
                            break;
                        }
                        last_span = token.location;
                        cursor = input.next();
                    }
                }
            }
        }

        if let Some(token) = cursor {
            errors.push(SyntaxError {
                span: token.location,
                expected: vec![EOS],
                found: Some(token),
            });
        }

        (tree, errors)
    }

    /// The terminals acceptable for a non-terminal: FIRST of the
    /// symbol, widened to FOLLOW when it is nullable.
    fn expected(&self, symbol: &Symbol<'sid>) -> Vec<&'sid str> {
        let first = self.table.first().first(symbol);
        let nullable = first.contains(&Symbol::epsilon());

        let mut expected: Vec<&'sid str> = first
            .iter()
            .filter(|sym| !sym.is_epsilon())
            .map(|sym| sym.id)
            .collect();

        if nullable {
            expected.extend(self.table.follow().follow(symbol).iter().map(|sym| sym.id));
        }

        expected.sort_unstable();
        expected.dedup();
        expected
    }
}

/// The outcome of a full analysis: the token stream, the derivation
/// tree and every error found, lexical and syntactic.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis<'sid> {
    pub tokens: Vec<Token<'sid>>,
    pub tree: ParseTree<'sid>,
    pub lexical_errors: Vec<LexicalError>,
    pub syntax_errors: Vec<SyntaxError<'sid>>,
}

/// Scans and parses a source text in one call.
///
/// Both stages recover from their errors, so the analysis always runs
/// to the end of the input and the report covers everything at once.
pub fn analyze<'sid>(
    source: &str,
    grammar: &Grammar<'sid>,
    table: &LlTable<'sid, '_>,
) -> Analysis<'sid> {
    let scanner = Scanner::new(grammar, source.chars());
    let (tokens, lexical_errors): (Vec<_>, Vec<_>) = scanner.partition_result();

    let parser = LlParser::new(table);
    let (tree, syntax_errors) = parser.parse(tokens.iter().cloned());

    Analysis {
        tokens,
        tree,
        lexical_errors,
        syntax_errors,
    }
}
