use std::hash::Hash;

use itertools::Itertools;

use crate::traits::SymbolSlice as _;
use crate::{Grammar, Symbol};

/// The rule's identifier in the grammar.
///
/// Rules are numbered in declaration order, starting at 0.
pub type RuleId = usize;

/// Defines a grammar rule
///
/// This object is internal to the grammar, which resolves it
/// into a [Rule] carrying the actual symbols.
///
/// X := A1..An
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef<'sid> {
    pub id: RuleId,
    pub lhs: &'sid str,
    pub rhs: Vec<&'sid str>,
}

impl<'sid> RuleDef<'sid> {
    pub fn new<I>(id: RuleId, lhs: &'sid str, rhs: I) -> Self
    where
        I: IntoIterator<Item = &'sid str>,
    {
        Self {
            id,
            lhs,
            rhs: rhs.into_iter().collect(),
        }
    }
}

/// A grammar rule
///
/// This object is produced by the grammar with
/// resolved symbols.
///
/// # Example
/// A -> w <eos>
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Rule<'sid> {
    pub id: RuleId,
    pub lhs: Symbol<'sid>,
    pub rhs: Vec<Symbol<'sid>>,
}

impl std::fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}) {} => {}",
            self.id,
            self.lhs,
            self.rhs.iter().map(|s| s.to_string()).join(" ")
        )
    }
}

impl Hash for Rule<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl Rule<'_> {
    /// Check the rule contains a certain symbol in its RHS.
    #[inline(always)]
    pub fn contains(&self, sym: &Symbol<'_>) -> bool {
        self.rhs.contains(sym)
    }

    /// True if the rule derives the empty string directly (A -> ε).
    #[inline(always)]
    pub fn is_epsilon(&self) -> bool {
        self.rhs.iter().all(|sym| sym.is_epsilon())
    }
}

/// A set of rules.
///
/// This object is used to generate the parse table.
#[derive(Debug)]
pub struct RuleSet<'sid, 'sym>(Vec<Rule<'sid>>, &'sym [Symbol<'sid>]);

impl<'sid> AsRef<[Symbol<'sid>]> for RuleSet<'sid, '_> {
    fn as_ref(&self) -> &[Symbol<'sid>] {
        self.1
    }
}

impl<'sid, 'sym> RuleSet<'sid, 'sym> {
    pub fn new(grammar: &'sym Grammar<'sid>) -> Self {
        Self(grammar.iter_rules().collect(), grammar.as_symbol_slice())
    }

    pub fn iter_symbols<'a>(&'a self) -> impl Iterator<Item = Symbol<'sid>> + 'a
    where
        'sid: 'a,
    {
        self.1.iter().copied()
    }

    /// Iterate over all rules of the grammar
    pub fn iter(&self) -> impl Iterator<Item = &Rule<'sid>> {
        self.0.iter()
    }

    pub fn iter_by_symbol<'a>(
        &'a self,
        sym: &Symbol<'sid>,
    ) -> impl Iterator<Item = &'a Rule<'sid>> + 'a
    where
        'sid: 'a,
    {
        let sym = *sym;
        self.iter().filter(move |rule| rule.lhs == sym)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the rule behind the id.
    ///
    /// # Panics
    /// Panics if the id does not belong to the set.
    pub fn borrow_rule(&self, id: RuleId) -> &Rule<'sid> {
        self.iter()
            .find(|rule| rule.id == id)
            .unwrap_or_else(|| panic!("the grammar does not include rule {}", id))
    }
}
