use crate::symbol::Symbol;
use crate::token::Token;

pub type NodeId = usize;

/// A node of the parse tree.
///
/// Terminal leaves carry the token they matched once the parser has
/// consumed it; a leaf left unfilled sits under a spot the input never
/// reached because of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'sid> {
    pub symbol: Symbol<'sid>,
    pub token: Option<Token<'sid>>,
    pub children: Vec<NodeId>,
}

/// The derivation tree of a parse, arena-allocated.
///
/// Nodes live in a flat vector and point at each other through
/// [NodeId]s; the root is always node 0. Expanding a production
/// allocates one child per right-hand-side symbol, ε included, so the
/// tree mirrors the derivation exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree<'sid> {
    nodes: Vec<Node<'sid>>,
}

impl<'sid> ParseTree<'sid> {
    pub fn new(root: Symbol<'sid>) -> Self {
        Self {
            nodes: vec![Node {
                symbol: root,
                token: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows a node.
    ///
    /// # Panics
    /// Panics if the id does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node<'sid> {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter().copied()
    }

    /// Iterates the matched tokens in source order.
    ///
    /// Walks the tree in preorder and yields the token of every filled
    /// leaf; ε leaves and leaves the input never reached are skipped.
    pub fn tokens(&self) -> Tokens<'_, 'sid> {
        Tokens {
            tree: self,
            stack: vec![self.root()],
        }
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, symbol: Symbol<'sid>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            symbol,
            token: None,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn fill(&mut self, id: NodeId, token: Token<'sid>) {
        self.nodes[id].token = Some(token);
    }

    fn label(&self, id: NodeId) -> String {
        let node = self.node(id);

        if node.symbol.is_epsilon() {
            return "ε".to_string();
        }

        match &node.token {
            Some(token) => format!("{} '{}'", node.symbol, token.value),
            None => node.symbol.to_string(),
        }
    }
}

impl std::fmt::Display for ParseTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.label(self.root()))?;

        let mut stack: Vec<(NodeId, String, bool)> = Vec::new();
        push_children(&mut stack, self, self.root(), "");

        while let Some((id, prefix, is_last)) = stack.pop() {
            let connector = if is_last { "└─" } else { "├─" };
            writeln!(f, "{prefix}{connector} {}", self.label(id))?;

            let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
            push_children(&mut stack, self, id, &child_prefix);
        }

        Ok(())
    }
}

fn push_children(
    stack: &mut Vec<(NodeId, String, bool)>,
    tree: &ParseTree<'_>,
    id: NodeId,
    prefix: &str,
) {
    let children = &tree.node(id).children;

    for (idx, &child) in children.iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), idx + 1 == children.len()));
    }
}

/// See [ParseTree::tokens].
pub struct Tokens<'a, 'sid> {
    tree: &'a ParseTree<'sid>,
    stack: Vec<NodeId>,
}

impl<'a, 'sid> Iterator for Tokens<'a, 'sid> {
    type Item = &'a Token<'sid>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);
            self.stack.extend(node.children.iter().rev());

            if let Some(token) = &node.token {
                return Some(token);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::ParseTree;
    use crate::lexer::Span;
    use crate::symbol::Symbol;
    use crate::token::Token;

    fn sample_tree() -> ParseTree<'static> {
        let mut tree = ParseTree::new(Symbol::nterm("S"));
        let b = tree.push_child(tree.root(), Symbol::nterm("B"));
        let a = tree.push_child(tree.root(), Symbol::term("a"));
        let leaf = tree.push_child(b, Symbol::term("b"));
        tree.push_child(b, Symbol::epsilon());

        tree.fill(leaf, Token::new("b", "b", Span::new(1, 1)));
        tree.fill(a, Token::new("a", "a", Span::new(1, 3)));
        tree
    }

    #[test]
    fn test_001_tokens_in_source_order() {
        let tree = sample_tree();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.children(tree.root()).count(), 2);

        let values: Vec<_> = tree.tokens().map(|tok| tok.value.as_str()).collect();
        assert_eq!(values, vec!["b", "a"]);
    }

    #[test]
    fn test_002_display() {
        let tree = sample_tree();

        assert_eq!(
            tree.to_string(),
            "S\n├─ B\n│  ├─ b 'b'\n│  └─ ε\n└─ a 'a'\n"
        );
    }
}
