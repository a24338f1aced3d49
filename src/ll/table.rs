use std::collections::HashMap;

use prettytable::Table;

use crate::error::ErrorKind;
use crate::grammar::Grammar;
use crate::rule::{Rule, RuleId, RuleSet};
use crate::symbol::Symbol;
use crate::traits::SymbolSlice as _;
use crate::LlanoResult;

use super::sets::{detect_left_recursion, FirstSets, FollowSets};

/// A row of the predictive table, keyed by terminal id.
#[derive(Debug, Default, Clone, PartialEq)]
struct Row<'sid> {
    cells: HashMap<&'sid str, RuleId>,
}

/// The LL(1) predictive table of a grammar.
///
/// Maps a (non-terminal, lookahead terminal) pair to the rule the
/// parser must expand. A rule lands in the cells of its FIRST set, and
/// in the cells of FOLLOW of its head when it is nullable. Building
/// the table fails with [ErrorKind::LeftRecursion] or
/// [ErrorKind::Conflict] when the grammar is not LL(1).
pub struct LlTable<'sid, 'sym> {
    symbols: &'sym [Symbol<'sid>],
    rules: RuleSet<'sid, 'sym>,
    rows: HashMap<&'sid str, Row<'sid>>,
    first: FirstSets<'sid>,
    follow: FollowSets<'sid>,
    start: Symbol<'sid>,
}

impl<'sid> AsRef<[Symbol<'sid>]> for LlTable<'sid, '_> {
    fn as_ref(&self) -> &[Symbol<'sid>] {
        self.symbols
    }
}

impl<'sid, 'sym> LlTable<'sid, 'sym> {
    pub fn build(grammar: &'sym Grammar<'sid>) -> LlanoResult<Self> {
        grammar.validate()?;

        let rules = RuleSet::new(grammar);
        let first = FirstSets::build(&rules);

        if let Some(cycle) = detect_left_recursion(&rules, &first) {
            return Err(ErrorKind::left_recursion(cycle).into());
        }

        let start = grammar.start().ok_or(ErrorKind::NoStartSymbol)?;
        let follow = FollowSets::build(&rules, &first, &start);

        let mut rows: HashMap<&'sid str, Row<'sid>> = grammar
            .iter_non_terminals()
            .map(|sym| (sym.id, Row::default()))
            .collect();

        for rule in rules.iter() {
            let first_of_rhs = first.first_of(&rule.rhs);
            let nullable = first_of_rhs.contains(&Symbol::epsilon());

            for terminal in first_of_rhs.iter().filter(|sym| !sym.is_epsilon()) {
                insert_cell(&mut rows, &rules, rule, terminal)?;
            }

            if nullable {
                for terminal in follow.follow(&rule.lhs).iter() {
                    insert_cell(&mut rows, &rules, rule, terminal)?;
                }
            }
        }

        Ok(Self {
            symbols: grammar.as_symbol_slice(),
            rules,
            rows,
            first,
            follow,
            start,
        })
    }

    /// The rule to expand for a non-terminal under a lookahead
    /// terminal, if the cell is filled.
    pub fn rule(&self, non_terminal: &Symbol<'sid>, terminal_id: &str) -> Option<RuleId> {
        self.rows
            .get(non_terminal.id)
            .and_then(|row| row.cells.get(terminal_id))
            .copied()
    }

    pub fn rules(&self) -> &RuleSet<'sid, 'sym> {
        &self.rules
    }

    pub fn first(&self) -> &FirstSets<'sid> {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets<'sid> {
        &self.follow
    }

    pub fn start(&self) -> Symbol<'sid> {
        self.start
    }
}

fn insert_cell<'sid>(
    rows: &mut HashMap<&'sid str, Row<'sid>>,
    rules: &RuleSet<'sid, '_>,
    rule: &Rule<'sid>,
    terminal: &Symbol<'sid>,
) -> LlanoResult<()> {
    let row = rows.entry(rule.lhs.id).or_default();

    match row.cells.insert(terminal.id, rule.id) {
        Some(existing) if existing != rule.id => Err(ErrorKind::conflict(
            rule.lhs.id,
            terminal.id,
            [rules.borrow_rule(existing).to_string(), rule.to_string()],
        )
        .into()),
        _ => Ok(()),
    }
}

impl std::fmt::Display for LlTable<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = Table::new();

        let terminals: Vec<Symbol> = self
            .iter_terminals()
            .filter(|sym| !sym.is_eos() && !sym.is_epsilon())
            .chain([Symbol::eos()])
            .collect();

        table.add_row(
            [""].into_iter()
                .chain(terminals.iter().map(|sym| sym.id))
                .collect(),
        );

        for nt in self.iter_non_terminals() {
            table.add_row(
                [nt.id.to_string()]
                    .into_iter()
                    .chain(terminals.iter().map(|terminal| {
                        self.rule(&nt, terminal.id)
                            .map(|id| format!("r{id}"))
                            .unwrap_or_default()
                    }))
                    .collect(),
            );
        }

        write!(f, "{table}")
    }
}

impl std::fmt::Debug for LlTable<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::LlTable;
    use crate::error::ErrorKind;
    use crate::symbol::EOS;
    use crate::traits::SymbolSlice as _;

    #[test]
    fn test_001_expr_table_cells() {
        let grammar = crate::fixtures::fixture_expr_grammar().unwrap();
        let table = LlTable::build(&grammar).unwrap();

        assert_eq!(table.rule(&grammar.sym("E"), "id"), Some(0));
        assert_eq!(table.rule(&grammar.sym("E"), "("), Some(0));
        assert_eq!(table.rule(&grammar.sym("E'"), "+"), Some(1));
        assert_eq!(table.rule(&grammar.sym("E'"), ")"), Some(2));
        assert_eq!(table.rule(&grammar.sym("E'"), EOS), Some(2));
        assert_eq!(table.rule(&grammar.sym("T'"), "*"), Some(4));
        assert_eq!(table.rule(&grammar.sym("T'"), EOS), Some(5));
        assert_eq!(table.rule(&grammar.sym("F"), "("), Some(6));
        assert_eq!(table.rule(&grammar.sym("F"), "id"), Some(7));

        assert_eq!(table.rule(&grammar.sym("E"), "+"), None);
        assert_eq!(table.rule(&grammar.sym("F"), "*"), None);
    }

    #[test]
    fn test_002_conflict() {
        let grammar = crate::fixtures::fixture_conflicting_grammar().unwrap();
        let err = LlTable::build(&grammar).unwrap_err();

        assert_eq!(
            err.kind(),
            &ErrorKind::conflict("S", "x", ["(0) S => A", "(1) S => B"])
        );
    }

    #[test]
    fn test_003_left_recursion_rejected() {
        let grammar = crate::fixtures::fixture_left_recursive_grammar().unwrap();
        let err = LlTable::build(&grammar).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::left_recursion(["E", "E"]));
    }

    #[test]
    fn test_004_minijava_table() {
        let grammar = crate::minijava::grammar().unwrap();
        let table = LlTable::build(&grammar).unwrap();

        assert_eq!(table.start().id, "Programa");
        assert_eq!(table.rule(&grammar.sym("Programa"), "class"), Some(0));
        assert_eq!(table.rule(&grammar.sym("CuerpoClase"), "int"), Some(2));
        assert_eq!(table.rule(&grammar.sym("CuerpoClase"), "}"), Some(3));
        assert_eq!(table.rule(&grammar.sym("MiembroPrima"), ";"), Some(5));
        assert_eq!(table.rule(&grammar.sym("MiembroPrima"), "("), Some(6));
        assert_eq!(table.rule(&grammar.sym("Sentencia"), "identificador"), Some(17));
        assert_eq!(table.rule(&grammar.sym("Sentencia"), "return"), Some(18));
        assert_eq!(table.rule(&grammar.sym("Sentencia"), "int"), Some(19));
        assert_eq!(table.rule(&grammar.sym("RetornoPrima"), ";"), Some(23));
        assert_eq!(table.rule(&grammar.sym("Factor"), "numero"), Some(32));
        assert_eq!(table.rule(&grammar.sym("Factor"), "("), Some(34));
        assert_eq!(table.rule(&grammar.sym("ExpresionPrima"), ";"), Some(27));

        assert_eq!(table.rule(&grammar.sym("Programa"), "int"), None);
    }

    #[test]
    fn test_005_display() {
        let grammar = crate::fixtures::fixture_expr_grammar().unwrap();
        let table = LlTable::build(&grammar).unwrap();
        let rendered = table.to_string();

        assert!(rendered.contains("<eos>"));
        assert!(rendered.contains("E'"));
        assert!(rendered.contains("r0"));
        assert!(rendered.contains("r7"));
    }
}
