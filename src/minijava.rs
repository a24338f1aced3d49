//! The Java-subset grammar the analyzer ships with.
//!
//! One class per program, `int`/`void` fields and methods, and a
//! statement language of assignments, returns and arithmetic
//! expressions. The expression rules are right-factored so the whole
//! grammar stays LL(1).

use crate::grammar::Grammar;
use crate::LlanoResult;

/// Textual form of the grammar, loadable with [Grammar::parse].
pub const GRAMMAR_TEXT: &str = "
    # One class with int/void members; statements are assignments,
    # returns and local declarations; expressions are arithmetic with
    # calls.

    terminals: class int void return + - * / = ; , ( ) { }
    identifier: identificador
    number: numero
    start: Programa

    Programa -> Clase
    Clase -> class identificador { CuerpoClase }
    CuerpoClase -> Miembro CuerpoClase | ε
    Miembro -> Tipo identificador MiembroPrima
    MiembroPrima -> ; | ( Parametros ) Bloque
    Parametros -> ListaParametros | ε
    ListaParametros -> Tipo identificador ListaParametrosPrima
    ListaParametrosPrima -> , Tipo identificador ListaParametrosPrima | ε
    Tipo -> int | void
    Bloque -> { ListaSentencias }
    ListaSentencias -> Sentencia ListaSentencias | ε
    Sentencia -> Asignacion | Retorno | Tipo identificador ;
    Asignacion -> identificador = Expresion ;
    Retorno -> return RetornoPrima
    RetornoPrima -> Expresion ; | ;
    Expresion -> Termino ExpresionPrima
    ExpresionPrima -> + Termino ExpresionPrima | - Termino ExpresionPrima | ε
    Termino -> Factor TerminoPrima
    TerminoPrima -> * Factor TerminoPrima | / Factor TerminoPrima | ε
    Factor -> numero | identificador FactorPrima | ( Expresion )
    FactorPrima -> ( Argumentos ) | ε
    Argumentos -> Expresion ArgumentosPrima | ε
    ArgumentosPrima -> , Expresion ArgumentosPrima | ε
";

/// Loads the grammar.
pub fn grammar() -> LlanoResult<Grammar<'static>> {
    Grammar::parse(GRAMMAR_TEXT)
}

#[cfg(test)]
mod tests {
    use super::grammar;
    use crate::ll::LlTable;
    use crate::traits::SymbolSlice as _;

    #[test]
    fn test_001_loads() {
        let grammar = grammar().unwrap();

        assert_eq!(grammar.start().unwrap().id, "Programa");
        assert_eq!(grammar.identifier_terminal().unwrap().id, "identificador");
        assert_eq!(grammar.number_terminal().unwrap().id, "numero");

        assert_eq!(grammar.iter_rules().count(), 41);
        assert_eq!(grammar.iter_non_terminals().count(), 23);
        assert_eq!(
            grammar
                .iter_terminals()
                .filter(|sym| !sym.is_eos() && !sym.is_epsilon())
                .count(),
            17
        );
    }

    #[test]
    fn test_002_builds_a_conflict_free_table() {
        let grammar = grammar().unwrap();
        LlTable::build(&grammar).unwrap();
    }
}
