use crate::lexer::Span;

/// A classified piece of source text.
///
/// The kind always names a terminal declared by the grammar
/// the token was scanned against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'sid> {
    pub kind: &'sid str,
    pub value: String,
    pub location: Span,
}

impl<'sid> Token<'sid> {
    pub fn new<S>(kind: &'sid str, value: S, location: Span) -> Self
    where
        S: ToString,
    {
        Self {
            kind,
            value: value.to_string(),
            location,
        }
    }
}
