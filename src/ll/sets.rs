use std::collections::{HashMap, HashSet};

use crate::rule::RuleSet;
use crate::symbol::Symbol;
use crate::traits::SymbolSlice as _;

/// The FIRST sets of a grammar.
///
/// FIRST(A) holds the terminals that can begin a sentence derived from
/// A, plus ε when A derives the empty string. Built by fixed point
/// over the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstSets<'sid> {
    sets: HashMap<&'sid str, HashSet<Symbol<'sid>>>,
}

impl<'sid> FirstSets<'sid> {
    pub fn build(rules: &RuleSet<'sid, '_>) -> Self {
        let mut sets: HashMap<&'sid str, HashSet<Symbol<'sid>>> = rules
            .iter_non_terminals()
            .map(|sym| (sym.id, HashSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;

            for rule in rules.iter() {
                let (first, nullable) = sequence_first(&rule.rhs, &sets);

                let set = sets.entry(rule.lhs.id).or_default();
                for sym in first {
                    changed |= set.insert(sym);
                }
                if nullable {
                    changed |= set.insert(Symbol::epsilon());
                }
            }
        }

        Self { sets }
    }

    /// FIRST of a single symbol. For a terminal this is the symbol
    /// itself.
    ///
    /// # Panics
    /// Panics if the symbol is a non-terminal the sets were not built
    /// over.
    pub fn first(&self, sym: &Symbol<'sid>) -> HashSet<Symbol<'sid>> {
        if sym.is_terminal() {
            return HashSet::from_iter([*sym]);
        }

        self.sets[sym.id].clone()
    }

    /// FIRST of a symbol sequence, ε included when the whole sequence
    /// is nullable.
    pub fn first_of(&self, seq: &[Symbol<'sid>]) -> HashSet<Symbol<'sid>> {
        let (mut first, nullable) = sequence_first(seq, &self.sets);
        if nullable {
            first.insert(Symbol::epsilon());
        }
        first
    }

    pub fn is_nullable(&self, sym: &Symbol<'sid>) -> bool {
        if sym.is_epsilon() {
            return true;
        }
        if sym.is_terminal() {
            return false;
        }

        self.sets[sym.id].contains(&Symbol::epsilon())
    }
}

/// FIRST of a sequence against the sets computed so far.
///
/// Returns the terminals that can begin the sequence, ε excluded, and
/// whether the whole sequence is nullable.
fn sequence_first<'sid>(
    seq: &[Symbol<'sid>],
    sets: &HashMap<&'sid str, HashSet<Symbol<'sid>>>,
) -> (HashSet<Symbol<'sid>>, bool) {
    let mut first = HashSet::new();

    for sym in seq {
        if sym.is_epsilon() {
            continue;
        }

        if sym.is_terminal() {
            first.insert(*sym);
            return (first, false);
        }

        let set = &sets[sym.id];
        first.extend(set.iter().filter(|sym| !sym.is_epsilon()).copied());

        if !set.contains(&Symbol::epsilon()) {
            return (first, false);
        }
    }

    (first, true)
}

/// The FOLLOW sets of a grammar.
///
/// FOLLOW(A) holds the terminals that can appear right after A in a
/// sentential form; `<eos>` belongs to FOLLOW of the start symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowSets<'sid> {
    sets: HashMap<&'sid str, HashSet<Symbol<'sid>>>,
}

impl<'sid> FollowSets<'sid> {
    pub fn build(
        rules: &RuleSet<'sid, '_>,
        first: &FirstSets<'sid>,
        start: &Symbol<'sid>,
    ) -> Self {
        let mut sets: HashMap<&'sid str, HashSet<Symbol<'sid>>> = rules
            .iter_non_terminals()
            .map(|sym| (sym.id, HashSet::new()))
            .collect();

        sets.entry(start.id).or_default().insert(Symbol::eos());

        let mut changed = true;
        while changed {
            changed = false;

            for rule in rules.iter() {
                for (idx, sym) in rule.rhs.iter().enumerate() {
                    if sym.is_terminal() {
                        continue;
                    }

                    let beta_first = first.first_of(&rule.rhs[idx + 1..]);
                    let nullable = beta_first.contains(&Symbol::epsilon());

                    let mut addition: HashSet<Symbol<'sid>> = beta_first
                        .into_iter()
                        .filter(|sym| !sym.is_epsilon())
                        .collect();

                    if nullable {
                        addition.extend(sets[rule.lhs.id].iter().copied());
                    }

                    let set = sets.entry(sym.id).or_default();
                    for sym in addition {
                        changed |= set.insert(sym);
                    }
                }
            }
        }

        Self { sets }
    }

    /// FOLLOW of a non-terminal.
    ///
    /// # Panics
    /// Panics if the symbol is not a non-terminal the sets were built
    /// over.
    pub fn follow(&self, sym: &Symbol<'sid>) -> &HashSet<Symbol<'sid>> {
        &self.sets[sym.id]
    }
}

/// Finds a left-recursive cycle among the non-terminals, if any.
///
/// There is an edge A -> B whenever a rule A -> αBβ exists with α
/// nullable; a cycle in that graph makes the expansion of its head
/// loop without ever consuming input, which rules out predictive
/// parsing.
pub(crate) fn detect_left_recursion<'sid>(
    rules: &RuleSet<'sid, '_>,
    first: &FirstSets<'sid>,
) -> Option<Vec<&'sid str>> {
    let mut edges: HashMap<&'sid str, Vec<&'sid str>> = HashMap::new();

    for rule in rules.iter() {
        for sym in &rule.rhs {
            if sym.is_epsilon() {
                continue;
            }
            if sym.is_terminal() {
                break;
            }

            edges.entry(rule.lhs.id).or_default().push(sym.id);

            if !first.is_nullable(sym) {
                break;
            }
        }
    }

    let mut done: HashSet<&'sid str> = HashSet::new();

    for root in rules.iter_non_terminals().map(|sym| sym.id) {
        if done.contains(root) {
            continue;
        }

        // Frames carry the next edge to follow; path mirrors the stack.
        let mut stack: Vec<(&'sid str, usize)> = vec![(root, 0)];
        let mut path: Vec<&'sid str> = vec![root];

        while let Some(frame) = stack.last_mut() {
            let (sym, child_idx) = (frame.0, frame.1);

            match edges
                .get(sym)
                .and_then(|targets| targets.get(child_idx))
                .copied()
            {
                Some(target) => {
                    frame.1 += 1;

                    if let Some(pos) = path.iter().position(|&sym| sym == target) {
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(target);
                        return Some(cycle);
                    }

                    if !done.contains(target) {
                        stack.push((target, 0));
                        path.push(target);
                    }
                }
                None => {
                    done.insert(sym);
                    path.pop();
                    stack.pop();
                }
            }
        }
    }

    None
}
