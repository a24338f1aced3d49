use crate::error::LexicalError;
use crate::grammar::Grammar;
use crate::token::Token;
use crate::traits::SymbolSlice as _;

/// The location of a token in the stream.
///
/// Lines are 1-based. Column 0 means "before the first character";
/// the first character of a line sits at column 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub struct NextLine;
pub struct NextColumn;

impl std::ops::Add<NextLine> for Span {
    type Output = Self;

    fn add(mut self, rhs: NextLine) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::Add<NextColumn> for Span {
    type Output = Self;

    fn add(mut self, rhs: NextColumn) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign<NextLine> for Span {
    fn add_assign(&mut self, _: NextLine) {
        self.column = 0;
        self.line += 1;
    }
}

impl std::ops::AddAssign<NextColumn> for Span {
    fn add_assign(&mut self, _: NextColumn) {
        self.column += 1;
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// A grammar-driven scanner.
///
/// Classifies source text against the terminal alphabet of a grammar:
/// a word matching a terminal id is a keyword, any other word falls to
/// the grammar's identifier terminal, digit runs fall to its number
/// terminal, and everything else must match a single-character
/// terminal. Whitespace and `//`, `/* */` comments are skipped.
///
/// Scanning never aborts: an unclassifiable character is reported as a
/// [LexicalError] and the scan resumes right after it, so one pass
/// surfaces every lexical error in the input.
pub struct Scanner<'sid, 'g, Stream>
where
    Stream: Iterator<Item = char>,
{
    grammar: &'g Grammar<'sid>,
    stream: Stream,
    span: Span,
    reconsume: Option<char>,
}

impl<'sid, 'g, Stream> Scanner<'sid, 'g, Stream>
where
    Stream: Iterator<Item = char>,
{
    pub fn new(grammar: &'g Grammar<'sid>, stream: Stream) -> Self {
        Self {
            grammar,
            stream,
            span: Span::default(),
            reconsume: None,
        }
    }

    fn next_char(&mut self) -> Option<char> {
        if let Some(ch) = self.reconsume.take() {
            return Some(ch);
        }

        self.stream.next().inspect(|&ch| {
            if ch == '\n' {
                self.span += NextLine;
            } else {
                self.span += NextColumn;
            }
        })
    }

    fn reconsume(&mut self, ch: char) {
        self.reconsume = Some(ch);
    }

    /// Looks the id up among the grammar's plain terminals.
    fn terminal(&self, id: &str) -> Option<&'sid str> {
        self.grammar
            .get_symbol_by_id(id)
            .filter(|sym| sym.is_terminal() && !sym.is_eos() && !sym.is_epsilon())
            .map(|sym| sym.id)
    }

    fn scan_word(&mut self, first: char, start: Span) -> Result<Token<'sid>, LexicalError> {
        let mut value = String::from(first);

        while let Some(ch) = self.next_char() {
            if is_word_char(ch) {
                value.push(ch);
            } else {
                self.reconsume(ch);
                break;
            }
        }

        if let Some(kind) = self.terminal(&value) {
            return Ok(Token::new(kind, value, start));
        }

        match self.grammar.identifier_terminal() {
            Some(sym) => Ok(Token::new(sym.id, value, start)),
            None => Err(LexicalError {
                span: start,
                character: first,
            }),
        }
    }

    fn scan_number(&mut self, first: char, start: Span) -> Result<Token<'sid>, LexicalError> {
        let mut value = String::from(first);

        while let Some(ch) = self.next_char() {
            if ch.is_ascii_digit() {
                value.push(ch);
            } else {
                self.reconsume(ch);
                break;
            }
        }

        match self.grammar.number_terminal() {
            Some(sym) => Ok(Token::new(sym.id, value, start)),
            None => Err(LexicalError {
                span: start,
                character: first,
            }),
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.next_char() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// An unterminated block comment silently ends with the input.
    fn skip_block_comment(&mut self) {
        let mut star = false;

        while let Some(ch) = self.next_char() {
            if star && ch == '/' {
                return;
            }
            star = ch == '*';
        }
    }
}

impl<'sid, 'g, Stream> Iterator for Scanner<'sid, 'g, Stream>
where
    Stream: Iterator<Item = char>,
{
    type Item = Result<Token<'sid>, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let ch = self.next_char()?;

            if ch.is_whitespace() {
                continue;
            }

            let start = self.span;

            if ch == '/' {
                match self.next_char() {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.skip_block_comment();
                        continue;
                    }
                    Some(other) => self.reconsume(other),
                    None => {}
                }
            }

            if is_word_start(ch) {
                return Some(self.scan_word(ch, start));
            }

            if ch.is_ascii_digit() {
                return Some(self.scan_number(ch, start));
            }

            let mut buf = [0u8; 4];
            if let Some(kind) = self.terminal(ch.encode_utf8(&mut buf)) {
                return Some(Ok(Token::new(kind, ch, start)));
            }

            return Some(Err(LexicalError {
                span: start,
                character: ch,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools as _;

    use super::{Scanner, Span};
    use crate::error::LexicalError;
    use crate::minijava;
    use crate::token::Token;
    use crate::Grammar;

    #[test]
    fn test_001_scan_minimal_program() {
        let grammar = minijava::grammar().expect("cannot load grammar");
        let scanner = Scanner::new(&grammar, "class A { int x; }".chars());

        let tokens = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        let expected_tokens = vec![
            Token::new("class", "class", Span::new(1, 1)),
            Token::new("identificador", "A", Span::new(1, 7)),
            Token::new("{", "{", Span::new(1, 9)),
            Token::new("int", "int", Span::new(1, 11)),
            Token::new("identificador", "x", Span::new(1, 15)),
            Token::new(";", ";", Span::new(1, 16)),
            Token::new("}", "}", Span::new(1, 18)),
        ];

        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_002_comments_and_newlines() {
        let grammar = minijava::grammar().expect("cannot load grammar");
        let source = "class A {\n  // field\n  int x; /* y */\n}";
        let scanner = Scanner::new(&grammar, source.chars());

        let tokens = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        let expected_tokens = vec![
            Token::new("class", "class", Span::new(1, 1)),
            Token::new("identificador", "A", Span::new(1, 7)),
            Token::new("{", "{", Span::new(1, 9)),
            Token::new("int", "int", Span::new(3, 3)),
            Token::new("identificador", "x", Span::new(3, 7)),
            Token::new(";", ";", Span::new(3, 8)),
            Token::new("}", "}", Span::new(4, 1)),
        ];

        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_003_single_character_recovery() {
        let grammar = minijava::grammar().expect("cannot load grammar");
        let scanner = Scanner::new(&grammar, "int x$ = 1; @".chars());

        let (tokens, errors): (Vec<_>, Vec<_>) = scanner.partition_result();

        let kinds: Vec<_> = tokens.iter().map(|tok| tok.kind).collect();
        assert_eq!(kinds, vec!["int", "identificador", "=", "numero", ";"]);

        assert_eq!(
            errors,
            vec![
                LexicalError {
                    span: Span::new(1, 6),
                    character: '$',
                },
                LexicalError {
                    span: Span::new(1, 13),
                    character: '@',
                },
            ]
        );
    }

    #[test]
    fn test_004_integer_literals() {
        let grammar = minijava::grammar().expect("cannot load grammar");
        let scanner = Scanner::new(&grammar, "x = 12 + 305;".chars());

        let tokens = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        let values: Vec<_> = tokens
            .iter()
            .filter(|tok| tok.kind == "numero")
            .map(|tok| tok.value.as_str())
            .collect();
        assert_eq!(values, vec!["12", "305"]);

        // A digit run ends at the first non-digit: 12ab is numero then identificador.
        let scanner = Scanner::new(&grammar, "12ab".chars());
        let tokens = scanner.collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::new("numero", "12", Span::new(1, 1)),
                Token::new("identificador", "ab", Span::new(1, 3)),
            ]
        );
    }

    #[test]
    fn test_005_undesignated_categories() {
        let mut grammar = Grammar::default();
        grammar
            .add_terminal_symbol("+")
            .expect("cannot declare terminal");

        let scanner = Scanner::new(&grammar, "a + 1".chars());
        let (tokens, errors): (Vec<_>, Vec<_>) = scanner.partition_result();

        let kinds: Vec<_> = tokens.iter().map(|tok| tok.kind).collect();
        assert_eq!(kinds, vec!["+"]);

        assert_eq!(
            errors,
            vec![
                LexicalError {
                    span: Span::new(1, 1),
                    character: 'a',
                },
                LexicalError {
                    span: Span::new(1, 5),
                    character: '1',
                },
            ]
        );
    }
}
