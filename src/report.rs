//! Plain-text and Graphviz renderings of the analysis artifacts.

use itertools::Itertools as _;
use prettytable::Table;

use crate::ast::{Node, NodeId, ParseTree};
use crate::error::{LexicalError, SyntaxError};
use crate::grammar::Grammar;
use crate::ll::LlTable;
use crate::token::Token;
use crate::traits::SymbolSlice as _;

fn banner(title: &str) -> String {
    let rule = "=".repeat(46);
    format!("{rule}\n {title}\n{rule}\n")
}

/// Renders the predictive table with its production legend.
pub fn render_table(table: &LlTable<'_, '_>) -> String {
    let mut out = String::new();

    out.push_str(&banner("LL(1) PARSE TABLE"));
    out.push('\n');
    out.push_str(&table.to_string());
    out.push('\n');

    out.push_str("Productions:\n");
    for rule in table.rules().iter() {
        out.push_str(&format!("  {rule}\n"));
    }

    out.push('\n');
    out.push_str("Notes:\n");
    out.push_str("  rN    expand production N\n");
    out.push_str("  blank no entry, the lookahead is a syntax error\n");
    out.push_str("  <eps> the empty string\n");
    out.push_str("  <eos> end of stream\n");

    out
}

/// Renders the error report of an analysis.
pub fn render_errors(lexical: &[LexicalError], syntax: &[SyntaxError<'_>]) -> String {
    let mut out = String::new();

    out.push_str(&banner("ANALYSIS ERROR REPORT"));
    out.push('\n');

    if lexical.is_empty() && syntax.is_empty() {
        out.push_str("No errors were found.\n");
        return out;
    }

    out.push_str(&format!(
        "{} lexical error(s), {} syntax error(s).\n",
        lexical.len(),
        syntax.len()
    ));

    if !lexical.is_empty() {
        out.push_str("\nLexical errors\n--------------\n");
        for (idx, error) in lexical.iter().enumerate() {
            out.push_str(&format!("{}. {error}\n", idx + 1));
        }
    }

    if !syntax.is_empty() {
        out.push_str("\nSyntax errors\n-------------\n");
        for (idx, error) in syntax.iter().enumerate() {
            out.push_str(&format!("{}. {error}\n", idx + 1));
        }
    }

    out
}

/// Renders the token stream as a table.
pub fn render_tokens(tokens: &[Token<'_>]) -> String {
    let mut table = Table::new();
    table.add_row(["#", "KIND", "LEXEME", "LINE", "COL"].into_iter().collect());

    for (idx, token) in tokens.iter().enumerate() {
        table.add_row(
            [
                (idx + 1).to_string(),
                token.kind.to_string(),
                token.value.clone(),
                token.location.line.to_string(),
                token.location.column.to_string(),
            ]
            .into_iter()
            .collect(),
        );
    }

    table.to_string()
}

/// Renders the grammar: alphabet, start symbol and productions.
pub fn render_grammar(grammar: &Grammar<'_>) -> String {
    let mut out = String::new();

    let terminals = grammar
        .iter_terminals()
        .filter(|sym| !sym.is_eos() && !sym.is_epsilon())
        .map(|sym| sym.id)
        .join(" ");
    let non_terminals = grammar.iter_non_terminals().map(|sym| sym.id).join(" ");

    out.push_str(&format!("Terminals     : {terminals}\n"));
    out.push_str(&format!("Non-terminals : {non_terminals}\n"));

    if let Some(start) = grammar.start() {
        out.push_str(&format!("Start symbol  : {start}\n"));
    }

    out.push_str("Productions   :\n");
    for rule in grammar.iter_rules() {
        out.push_str(&format!("  {rule}\n"));
    }

    out
}

/// Renders the FIRST and FOLLOW sets of every non-terminal.
pub fn render_sets(table: &LlTable<'_, '_>) -> String {
    let mut grid = Table::new();
    grid.add_row(["NON-TERMINAL", "FIRST", "FOLLOW"].into_iter().collect());

    for sym in table.iter_non_terminals() {
        let first = table
            .first()
            .first(&sym)
            .iter()
            .map(ToString::to_string)
            .sorted()
            .join(", ");
        let follow = table
            .follow()
            .follow(&sym)
            .iter()
            .map(ToString::to_string)
            .sorted()
            .join(", ");

        grid.add_row([sym.id.to_string(), first, follow].into_iter().collect());
    }

    grid.to_string()
}

/// Renders the derivation tree.
pub fn render_tree(tree: &ParseTree<'_>) -> String {
    let mut out = String::new();
    out.push_str(&banner("DERIVATION TREE"));
    out.push('\n');
    out.push_str(&tree.to_string());
    out
}

/// Graphviz rendering of the full derivation tree, ε leaves included.
pub fn derivation_dot(tree: &ParseTree<'_>) -> String {
    let mut out = String::new();
    out.push_str("digraph derivation {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [style=filled, fontname=\"Helvetica\"];\n");

    let mut stack: Vec<NodeId> = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        out.push_str(&format!(
            "  n{id} [label=\"{}\", {}];\n",
            escape_dot(&node_label(tree, id)),
            node_style(node)
        ));

        for child in tree.children(id) {
            out.push_str(&format!("  n{id} -> n{child};\n"));
        }

        stack.extend(tree.children(id));
    }

    out.push_str("}\n");
    out
}

/// Graphviz rendering of the condensed tree: ε leaves are pruned and
/// chains of single-child non-terminals are collapsed onto their only
/// meaningful descendant.
pub fn ast_dot(tree: &ParseTree<'_>) -> String {
    let mut out = String::new();
    out.push_str("digraph ast {\n");
    out.push_str("  rankdir=TB;\n");
    out.push_str("  node [style=filled, fontname=\"Helvetica\"];\n");

    let mut stack: Vec<NodeId> = vec![condense(tree, tree.root())];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        out.push_str(&format!(
            "  n{id} [label=\"{}\", {}];\n",
            escape_dot(&node_label(tree, id)),
            node_style(node)
        ));

        for child in tree.children(id) {
            if tree.node(child).symbol.is_epsilon() {
                continue;
            }

            let child = condense(tree, child);
            out.push_str(&format!("  n{id} -> n{child};\n"));
            stack.push(child);
        }
    }

    out.push_str("}\n");
    out
}

/// Follows single-child chains down to the node worth drawing.
fn condense(tree: &ParseTree<'_>, mut id: NodeId) -> NodeId {
    loop {
        let significant: Vec<NodeId> = tree
            .children(id)
            .filter(|&child| !tree.node(child).symbol.is_epsilon())
            .collect();

        match significant.as_slice() {
            [only] if tree.node(id).token.is_none() => id = *only,
            _ => return id,
        }
    }
}

fn node_label(tree: &ParseTree<'_>, id: NodeId) -> String {
    let node = tree.node(id);

    if node.symbol.is_epsilon() {
        return "ε".to_string();
    }

    match &node.token {
        Some(token) => token.value.clone(),
        None => node.symbol.id.to_string(),
    }
}

fn node_style(node: &Node<'_>) -> &'static str {
    if node.symbol.is_terminal() {
        "shape=box, fillcolor=\"#C5E1A5\", color=\"#558B2F\""
    } else {
        "shape=ellipse, fillcolor=\"#FFE6CC\", color=\"#FF8C00\""
    }
}

fn escape_dot(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}
