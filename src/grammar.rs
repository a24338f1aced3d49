use crate::error::{ErrorKind, LlanoError};
use crate::lexer::Span;
use crate::rule::{Rule, RuleDef};
use crate::symbol::{Symbol, EPSILON};
use crate::traits::SymbolSlice as _;
use crate::LlanoResult;

/// A context-free grammar, the input of the LL(1) table construction.
///
/// Holds the symbol alphabet and the productions over it. Symbols must
/// be declared before they are used in a production; the special
/// symbols `<eos>` and `<eps>` are always present. Two terminals can be
/// designated as lexical categories, identifier and number, which the
/// [Scanner](crate::lexer::Scanner) falls back to when a word or a
/// digit run matches no terminal id.
#[derive(Debug, Clone)]
pub struct Grammar<'sid> {
    symbols: Vec<Symbol<'sid>>,
    rules: Vec<RuleDef<'sid>>,
    start: Option<&'sid str>,
    identifier: Option<&'sid str>,
    number: Option<&'sid str>,
}

impl Default for Grammar<'_> {
    fn default() -> Self {
        Self {
            symbols: vec![Symbol::eos(), Symbol::epsilon()],
            rules: Vec::default(),
            start: None,
            identifier: None,
            number: None,
        }
    }
}

impl<'sid> AsRef<[Symbol<'sid>]> for Grammar<'sid> {
    fn as_ref(&self) -> &[Symbol<'sid>] {
        &self.symbols
    }
}

impl<'sid> Grammar<'sid> {
    pub fn add_terminal_symbol(&mut self, id: &'sid str) -> LlanoResult<&mut Self> {
        if self.get_symbol_by_id(id).is_some() {
            return Err(ErrorKind::duplicated_symbol(id).into());
        }

        self.symbols.push(Symbol::term(id));
        Ok(self)
    }

    pub fn add_non_terminal_symbol(&mut self, id: &'sid str) -> LlanoResult<&mut Self> {
        if self.get_symbol_by_id(id).is_some() {
            return Err(ErrorKind::duplicated_symbol(id).into());
        }

        self.symbols.push(Symbol::nterm(id));
        Ok(self)
    }

    /// Declares the terminal every word that is not a keyword falls to.
    pub fn add_identifier_terminal(&mut self, id: &'sid str) -> LlanoResult<&mut Self> {
        if let Some(existing) = self.identifier {
            return Err(ErrorKind::DuplicatedCategory {
                category: "identifier",
                existing: existing.to_string(),
            }
            .into());
        }

        self.add_terminal_symbol(id)?;
        self.identifier = Some(id);
        Ok(self)
    }

    /// Declares the terminal digit runs fall to.
    pub fn add_number_terminal(&mut self, id: &'sid str) -> LlanoResult<&mut Self> {
        if let Some(existing) = self.number {
            return Err(ErrorKind::DuplicatedCategory {
                category: "number",
                existing: existing.to_string(),
            }
            .into());
        }

        self.add_terminal_symbol(id)?;
        self.number = Some(id);
        Ok(self)
    }

    /// Adds the production `lhs -> rhs`.
    ///
    /// Every symbol must have been declared beforehand. An empty right
    /// hand side stands for the ε-production.
    pub fn add_rule<I>(&mut self, lhs: &'sid str, rhs: I) -> LlanoResult<&mut Self>
    where
        I: IntoIterator<Item = &'sid str>,
    {
        let lhs_sym = self.try_sym(lhs)?;
        if lhs_sym.is_terminal() {
            return Err(ErrorKind::TerminalRuleLhs(lhs.to_string()).into());
        }

        let mut ids = Vec::new();
        for id in rhs {
            self.try_sym(id)?;
            ids.push(id);
        }

        if ids.is_empty() {
            ids.push(EPSILON);
        }

        self.rules.push(RuleDef::new(self.rules.len(), lhs, ids));
        Ok(self)
    }

    pub fn set_start_symbol(&mut self, id: &'sid str) -> LlanoResult<&mut Self> {
        let sym = self.try_sym(id)?;
        if sym.is_terminal() {
            return Err(ErrorKind::InvalidStartSymbol(id.to_string()).into());
        }

        self.start = Some(id);
        Ok(self)
    }

    pub fn start(&self) -> Option<Symbol<'sid>> {
        self.start.and_then(|id| self.get_symbol_by_id(id))
    }

    pub fn identifier_terminal(&self) -> Option<Symbol<'sid>> {
        self.identifier.and_then(|id| self.get_symbol_by_id(id))
    }

    pub fn number_terminal(&self) -> Option<Symbol<'sid>> {
        self.number.and_then(|id| self.get_symbol_by_id(id))
    }

    /// Iterates the productions with their symbols resolved.
    pub fn iter_rules(&self) -> impl Iterator<Item = Rule<'sid>> + '_ {
        // Ids are checked by add_rule, resolution cannot fail.
        self.rules.iter().map(|def| Rule {
            id: def.id,
            lhs: self.sym(def.lhs),
            rhs: def.rhs.iter().map(|id| self.sym(id)).collect(),
        })
    }

    /// Checks the grammar is complete enough to build a table from.
    pub fn validate(&self) -> LlanoResult<()> {
        if self.rules.is_empty() {
            return Err(ErrorKind::EmptyGrammar.into());
        }

        if self.start.is_none() {
            return Err(ErrorKind::NoStartSymbol.into());
        }

        for sym in self.iter_non_terminals() {
            if !self.rules.iter().any(|def| def.lhs == sym.id) {
                return Err(ErrorKind::NoProductions(sym.id.to_string()).into());
            }
        }

        Ok(())
    }

    /// Loads a grammar from its textual form.
    ///
    /// The text is a sequence of lines; `#` starts a comment and blank
    /// lines are skipped. Directive lines declare the alphabet:
    ///
    /// ```text
    /// terminals: + * ( )
    /// identifier: id
    /// number: num
    /// start: E
    /// ```
    ///
    /// `terminals:` may appear several times and accumulates. Every
    /// other line is a production `A -> α | β`, alternatives separated
    /// by `|`; an empty alternative, or the marker `ε` / `<eps>`
    /// standing alone, is the ε-production. Non-terminals are declared
    /// implicitly by the production heads, in first-appearance order.
    ///
    /// Errors point at the offending line through their [Span].
    pub fn parse(text: &'sid str) -> LlanoResult<Self> {
        let mut terminals: Vec<(usize, &'sid str)> = Vec::new();
        let mut identifier: Option<(usize, &'sid str)> = None;
        let mut number: Option<(usize, &'sid str)> = None;
        let mut start: Option<(usize, &'sid str)> = None;
        let mut productions: Vec<(usize, &'sid str, Vec<Vec<&'sid str>>)> = Vec::new();

        for (line_no, raw) in text.lines().enumerate() {
            let line_no = line_no + 1;
            let line = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let line = line.trim();

            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("terminals:") {
                terminals.extend(rest.split_whitespace().map(|id| (line_no, id)));
            } else if let Some(rest) = line.strip_prefix("identifier:") {
                set_directive(&mut identifier, rest, "identifier", line_no)?;
            } else if let Some(rest) = line.strip_prefix("number:") {
                set_directive(&mut number, rest, "number", line_no)?;
            } else if let Some(rest) = line.strip_prefix("start:") {
                set_directive(&mut start, rest, "start", line_no)?;
            } else if let Some((head, body)) = line.split_once("->") {
                let mut words = head.split_whitespace();
                let lhs = words
                    .next()
                    .filter(|_| words.next().is_none())
                    .ok_or_else(|| {
                        LlanoError::new(
                            ErrorKind::malformed_rule(format!("invalid production head: {line}")),
                            Some(Span::new(line_no, 0)),
                        )
                    })?;

                let alternatives = body
                    .split('|')
                    .map(|alt| alt.split_whitespace().collect())
                    .collect();
                productions.push((line_no, lhs, alternatives));
            } else {
                return Err(LlanoError::new(
                    ErrorKind::malformed_rule(format!(
                        "expected a directive or a production: {line}"
                    )),
                    Some(Span::new(line_no, 0)),
                ));
            }
        }

        let mut grammar = Grammar::default();

        for (line, id) in terminals {
            grammar
                .add_terminal_symbol(id)
                .map_err(|err| err.with_span(Span::new(line, 0)))?;
        }

        if let Some((line, id)) = identifier {
            grammar
                .add_identifier_terminal(id)
                .map_err(|err| err.with_span(Span::new(line, 0)))?;
        }

        if let Some((line, id)) = number {
            grammar
                .add_number_terminal(id)
                .map_err(|err| err.with_span(Span::new(line, 0)))?;
        }

        for (line, lhs, _) in &productions {
            if grammar.get_symbol_by_id(lhs).is_none() {
                grammar
                    .add_non_terminal_symbol(lhs)
                    .map_err(|err| err.with_span(Span::new(*line, 0)))?;
            }
        }

        for (line, lhs, alternatives) in productions {
            let span = Span::new(line, 0);

            for alt in alternatives {
                if alt.is_empty() || alt == [EPSILON] || alt == ["ε"] {
                    grammar
                        .add_rule(lhs, [])
                        .map_err(|err| err.with_span(span))?;
                } else if alt.iter().any(|&id| id == EPSILON || id == "ε") {
                    return Err(LlanoError::new(
                        ErrorKind::malformed_rule("the empty production must stand alone"),
                        Some(span),
                    ));
                } else {
                    grammar
                        .add_rule(lhs, alt)
                        .map_err(|err| err.with_span(span))?;
                }
            }
        }

        if let Some((line, id)) = start {
            grammar
                .set_start_symbol(id)
                .map_err(|err| err.with_span(Span::new(line, 0)))?;
        }

        grammar.validate()?;
        Ok(grammar)
    }
}

fn set_directive<'sid>(
    slot: &mut Option<(usize, &'sid str)>,
    rest: &'sid str,
    name: &str,
    line_no: usize,
) -> LlanoResult<()> {
    let span = Span::new(line_no, 0);

    let mut words = rest.split_whitespace();
    let id = words
        .next()
        .filter(|_| words.next().is_none())
        .ok_or_else(|| {
            LlanoError::new(
                ErrorKind::malformed_rule(format!("the {name} directive takes a single symbol")),
                Some(span),
            )
        })?;

    if slot.is_some() {
        return Err(LlanoError::new(
            ErrorKind::malformed_rule(format!("duplicate {name} directive")),
            Some(span),
        ));
    }

    *slot = Some((line_no, id));
    Ok(())
}
