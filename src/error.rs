use itertools::Itertools as _;
use thiserror::Error;

use crate::lexer::Span;
use crate::token::Token;

/// The productions colliding over one table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRules(Vec<String>);

impl std::fmt::Display for CandidateRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().join(", ").fmt(f)
    }
}

impl CandidateRules {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// The non-terminals along a left-recursive derivation, first one repeated last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCycle(Vec<String>);

impl std::fmt::Display for SymbolCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().join(" -> ").fmt(f)
    }
}

impl SymbolCycle {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("a symbol with the same identifier already exists: {0}")]
    DuplicatedSymbolId(String),

    #[error("unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("rule left-hand side {0} is not a non-terminal")]
    TerminalRuleLhs(String),

    #[error("the {category} terminal is already designated: {existing}")]
    DuplicatedCategory {
        category: &'static str,
        existing: String,
    },

    #[error("non-terminal {0} has no production")]
    NoProductions(String),

    #[error("the grammar has no start symbol")]
    NoStartSymbol,

    #[error("start symbol {0} is not a declared non-terminal")]
    InvalidStartSymbol(String),

    #[error("the grammar has no rules")]
    EmptyGrammar,

    #[error("malformed rule: {0}")]
    MalformedRule(String),

    #[error("the grammar is not LL(1), conflicting rules for cell ({non_terminal}, {terminal}): {candidates}")]
    Conflict {
        non_terminal: String,
        terminal: String,
        candidates: CandidateRules,
    },

    #[error("left recursion detected: {0}")]
    LeftRecursion(SymbolCycle),
}

impl ErrorKind {
    pub fn unknown_symbol(id: &str) -> Self {
        Self::UnknownSymbol(id.to_string())
    }

    pub fn duplicated_symbol(id: &str) -> Self {
        Self::DuplicatedSymbolId(id.to_string())
    }

    pub fn malformed_rule<S: ToString>(reason: S) -> Self {
        Self::MalformedRule(reason.to_string())
    }

    pub fn conflict<I, S>(non_terminal: &str, terminal: &str, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::Conflict {
            non_terminal: non_terminal.to_string(),
            terminal: terminal.to_string(),
            candidates: CandidateRules(candidates.into_iter().map(|c| c.to_string()).collect()),
        }
    }

    pub fn left_recursion<I, S>(cycle: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::LeftRecursion(SymbolCycle(cycle.into_iter().map(|s| s.to_string()).collect()))
    }
}

/// A fatal grammar or table construction error.
///
/// Scanning and parsing never produce this type, they record
/// [LexicalError] and [SyntaxError] diagnostics instead.
#[derive(Debug, Clone, PartialEq)]
pub struct LlanoError {
    kind: ErrorKind,
    span: Option<Span>,
}

impl LlanoError {
    pub fn new(kind: impl Into<ErrorKind>, span: Option<Span>) -> Self {
        Self {
            kind: kind.into(),
            span,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl From<ErrorKind> for LlanoError {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }
}

impl std::fmt::Display for LlanoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} ({})", self.kind, span),
            None => self.kind.fmt(f),
        }
    }
}

impl std::error::Error for LlanoError {}

/// A recorded scanning diagnostic. Never aborts the scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("lexical error at {span}: unrecognized character {character:?}")]
pub struct LexicalError {
    pub span: Span,
    pub character: char,
}

/// A recorded parsing diagnostic. Never aborts the parse.
///
/// `found` is `None` when the input ended before the parse was complete.
/// `expected` is sorted so two runs over the same input compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError<'sid> {
    pub span: Span,
    pub expected: Vec<&'sid str>,
    pub found: Option<Token<'sid>>,
}

impl std::fmt::Display for SyntaxError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let expecting = self.expected.iter().join(", ");
        match &self.found {
            Some(token) => write!(
                f,
                "syntax error at {}: unexpected {}, expecting {}",
                self.span, token.kind, expecting
            ),
            None => write!(
                f,
                "syntax error at {}: unexpected end of input, expecting {}",
                self.span, expecting
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, LexicalError, LlanoError, SyntaxError};
    use crate::lexer::Span;
    use crate::token::Token;

    #[test]
    fn test_001_error_display() {
        let err = LlanoError::from(ErrorKind::unknown_symbol("Expresion"));
        assert_eq!(err.to_string(), "unknown symbol Expresion");

        let err = err.with_span(Span::new(3, 0));
        assert_eq!(err.to_string(), "unknown symbol Expresion (line 3, column 0)");

        let err = LlanoError::from(ErrorKind::conflict(
            "S",
            "x",
            ["(0) S => A", "(1) S => B"],
        ));
        assert_eq!(
            err.to_string(),
            "the grammar is not LL(1), conflicting rules for cell (S, x): (0) S => A, (1) S => B"
        );

        let err = LlanoError::from(ErrorKind::left_recursion(["E", "E"]));
        assert_eq!(err.to_string(), "left recursion detected: E -> E");
    }

    #[test]
    fn test_002_diagnostic_display() {
        let lexical = LexicalError {
            span: Span::new(1, 5),
            character: '$',
        };
        assert_eq!(
            lexical.to_string(),
            "lexical error at line 1, column 5: unrecognized character '$'"
        );

        let syntax = SyntaxError {
            span: Span::new(1, 17),
            expected: vec!["(", ";"],
            found: Some(Token::new("}", "}", Span::new(1, 17))),
        };
        assert_eq!(
            syntax.to_string(),
            "syntax error at line 1, column 17: unexpected }, expecting (, ;"
        );

        let premature = SyntaxError {
            span: Span::new(1, 0),
            expected: vec!["class"],
            found: None,
        };
        assert_eq!(
            premature.to_string(),
            "syntax error at line 1, column 0: unexpected end of input, expecting class"
        );
    }
}
