use std::hash::Hash;

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
    Eos,
    Epsilon,
}

/// Defines a symbol
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Symbol<'sid> {
    /// *Unique* identifier of the symbol
    pub id: &'sid str,
    kind: SymbolKind,
}

pub const EOS: &str = "<eos>";
pub const EPSILON: &str = "<eps>";

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<'sid> Symbol<'sid> {
    /// Creates a new symbol
    pub const fn new(id: &'sid str, terminal: bool) -> Self {
        Self {
            id,
            kind: if terminal {
                SymbolKind::Terminal
            } else {
                SymbolKind::NonTerminal
            },
        }
    }

    pub const fn term(id: &'sid str) -> Self {
        Self::new(id, true)
    }

    pub const fn nterm(id: &'sid str) -> Self {
        Self::new(id, false)
    }

    /// Creates the end-of-stream symbol ($, or <eos>)
    pub const fn eos() -> Self {
        Self {
            id: EOS,
            kind: SymbolKind::Eos,
        }
    }

    /// Creates the epsilon symbol (ε)
    ///
    /// This is used for empty rules such as A -> ε ;
    pub const fn epsilon() -> Self {
        Self {
            id: EPSILON,
            kind: SymbolKind::Epsilon,
        }
    }

    pub const fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// True for anything the parser never expands: plain terminals, <eos> and ε.
    #[inline(always)]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::Eos | SymbolKind::Epsilon | SymbolKind::Terminal
        )
    }

    #[inline(always)]
    pub fn is_eos(&self) -> bool {
        matches!(self.kind, SymbolKind::Eos)
    }

    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        matches!(self.kind, SymbolKind::Epsilon)
    }
}

impl Hash for Symbol<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub mod traits {
    use crate::error::ErrorKind;
    use crate::{LlanoResult, Symbol};

    /// Common lookups for any ordered collection of grammar symbols.
    pub trait SymbolSlice<'sid>: AsRef<[Symbol<'sid>]> {
        fn as_symbol_slice(&self) -> &[Symbol<'sid>] {
            self.as_ref()
        }

        fn get_symbol_by_id(&self, id: &str) -> Option<Symbol<'sid>> {
            self.as_ref().iter().find(|sym| sym.id == id).copied()
        }

        fn try_sym(&self, id: &str) -> LlanoResult<Symbol<'sid>> {
            self.get_symbol_by_id(id)
                .ok_or_else(|| ErrorKind::unknown_symbol(id).into())
        }

        /// Returns the symbol behind the id.
        ///
        /// # Panics
        /// Panics if no symbol matches the id.
        fn sym(&self, id: &str) -> Symbol<'sid> {
            self.get_symbol_by_id(id)
                .unwrap_or_else(|| panic!("the grammar does not include symbol {}", id))
        }

        /// # Panics
        /// Panics if the collection does not hold the <eos> symbol.
        fn eos(&self) -> Symbol<'sid> {
            self.as_ref()
                .iter()
                .find(|sym| sym.is_eos())
                .copied()
                .expect("the grammar does not include the <eos> terminal")
        }

        /// # Panics
        /// Panics if the collection does not hold the ε symbol.
        fn epsilon(&self) -> Symbol<'sid> {
            self.as_ref()
                .iter()
                .find(|sym| sym.is_epsilon())
                .copied()
                .expect("the grammar does not include the <eps> terminal")
        }

        fn iter_terminals<'a>(&'a self) -> impl Iterator<Item = Symbol<'sid>> + 'a
        where
            'sid: 'a,
        {
            self.as_ref().iter().filter(|sym| sym.is_terminal()).copied()
        }

        fn iter_non_terminals<'a>(&'a self) -> impl Iterator<Item = Symbol<'sid>> + 'a
        where
            'sid: 'a,
        {
            self.as_ref().iter().filter(|sym| !sym.is_terminal()).copied()
        }
    }

    impl<'sid, T> SymbolSlice<'sid> for T where T: AsRef<[Symbol<'sid>]> + ?Sized {}
}

#[cfg(test)]
mod tests {
    use super::traits::SymbolSlice as _;
    use super::{Symbol, EOS, EPSILON};

    #[test]
    fn test_001_symbol_predicates() {
        assert!(Symbol::term("+").is_terminal());
        assert!(!Symbol::nterm("E").is_terminal());
        assert!(Symbol::eos().is_terminal());
        assert!(Symbol::epsilon().is_terminal());
        assert!(Symbol::eos().is_eos());
        assert!(Symbol::epsilon().is_epsilon());
        assert_eq!(Symbol::eos().id, EOS);
        assert_eq!(Symbol::epsilon().id, EPSILON);
    }

    #[test]
    fn test_002_symbol_slice_lookups() {
        let symbols = [
            Symbol::eos(),
            Symbol::epsilon(),
            Symbol::term("+"),
            Symbol::nterm("E"),
        ];

        assert_eq!(symbols.sym("+"), Symbol::term("+"));
        assert_eq!(symbols.eos(), Symbol::eos());
        assert_eq!(symbols.epsilon(), Symbol::epsilon());
        assert!(symbols.get_symbol_by_id("?").is_none());
        assert!(symbols.try_sym("?").is_err());

        let terminals: Vec<_> = symbols.iter_terminals().map(|sym| sym.id).collect();
        assert_eq!(terminals, vec![EOS, EPSILON, "+"]);

        let non_terminals: Vec<_> = symbols.iter_non_terminals().map(|sym| sym.id).collect();
        assert_eq!(non_terminals, vec!["E"]);
    }
}
