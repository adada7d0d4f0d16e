//! Tokenizer for textual IR records

use crate::error::{Error, Result};

/// A single token with its 1-indexed source position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's kind and payload
    pub kind: TokenKind,
    /// Line the token starts on
    pub line: u32,
    /// Column the token starts at
    pub column: u32,
}

/// Token kinds produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// Integer literal (decimal or `0x` hex)
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// String literal, escapes resolved
    Str(String),
    /// Bare symbol
    Symbol(String),
    /// `:name` keyword
    Keyword(String),
    /// End of input
    Eof,
}

/// Scanner over textual IR source
pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    current: usize,
    line: u32,
    column: u32,
}

impl Scanner {
    /// Create a scanner over the given source
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan the whole input, ending with an `Eof` token
    pub fn scan_tokens(mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.scan_token()?;
        }
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            column: self.column,
        });
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<()> {
        let line = self.line;
        let column = self.column;
        let c = self.advance();

        match c {
            ' ' | '\r' | '\t' => {}
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            // Comments run to end of line.
            ';' => {
                while !self.is_at_end() && self.peek() != '\n' {
                    self.advance();
                }
            }
            '(' => self.push(TokenKind::LeftParen, line, column),
            ')' => self.push(TokenKind::RightParen, line, column),
            '"' => self.scan_string(line, column)?,
            ':' => {
                let name = self.take_symbol_chars(String::new());
                self.push(TokenKind::Keyword(name), line, column);
            }
            '-' if self.peek().is_ascii_digit() => self.scan_number(true, line, column)?,
            c if c.is_ascii_digit() => {
                self.current -= 1;
                self.column -= 1;
                self.scan_number(false, line, column)?;
            }
            c => {
                let name = self.take_symbol_chars(c.to_string());
                self.push(TokenKind::Symbol(name), line, column);
            }
        }
        Ok(())
    }

    fn scan_number(&mut self, negative: bool, line: u32, column: u32) -> Result<()> {
        // 0x prefix switches to hex.
        if self.peek() == '0' && self.peek_next() == 'x' {
            self.advance();
            self.advance();
            let mut digits = String::new();
            while self.peek().is_ascii_hexdigit() {
                digits.push(self.advance());
            }
            let value = i64::from_str_radix(&digits, 16)
                .map_err(|_| self.malformed(&digits, line, column))?;
            let value = if negative { -value } else { value };
            self.push(TokenKind::Int(value), line, column);
            return Ok(());
        }

        let mut lexeme = String::new();
        if negative {
            lexeme.push('-');
        }
        let mut is_float = false;
        while self.peek().is_ascii_digit() || (self.peek() == '.' && !is_float) {
            let c = self.advance();
            if c == '.' {
                is_float = true;
            }
            lexeme.push(c);
        }

        let kind = if is_float {
            TokenKind::Float(
                lexeme
                    .parse()
                    .map_err(|_| self.malformed(&lexeme, line, column))?,
            )
        } else {
            TokenKind::Int(
                lexeme
                    .parse()
                    .map_err(|_| self.malformed(&lexeme, line, column))?,
            )
        };
        self.push(kind, line, column);
        Ok(())
    }

    fn scan_string(&mut self, line: u32, column: u32) -> Result<()> {
        let mut value = String::new();
        loop {
            if self.is_at_end() {
                return Err(Error::invalid("unterminated string").at(line, column));
            }
            match self.advance() {
                '"' => break,
                '\\' => {
                    if self.is_at_end() {
                        return Err(Error::invalid("unterminated string").at(line, column));
                    }
                    match self.advance() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            return Err(Error::invalid(format!(
                                "unknown string escape '\\{other}'"
                            ))
                            .at(line, column));
                        }
                    }
                }
                '\n' => {
                    value.push('\n');
                    self.line += 1;
                    self.column = 1;
                }
                c => value.push(c),
            }
        }
        self.push(TokenKind::Str(value), line, column);
        Ok(())
    }

    fn take_symbol_chars(&mut self, mut name: String) -> String {
        while !self.is_at_end() && is_symbol_char(self.peek()) {
            name.push(self.advance());
        }
        name
    }

    fn malformed(&self, lexeme: &str, line: u32, column: u32) -> Error {
        Error::invalid(format!("malformed number '{lexeme}'")).at(line, column)
    }

    fn push(&mut self, kind: TokenKind, line: u32, column: u32) {
        self.tokens.push(Token { kind, line, column });
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

fn is_symbol_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | ';')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_instruction_tuples() {
        assert_eq!(
            kinds("(add 2 0 1)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Symbol("add".into()),
                TokenKind::Int(2),
                TokenKind::Int(0),
                TokenKind::Int(1),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_literals() {
        assert_eq!(
            kinds("-7 0x2a 1.5 \"hi\\n\" :start true"),
            vec![
                TokenKind::Int(-7),
                TokenKind::Int(42),
                TokenKind::Float(1.5),
                TokenKind::Str("hi\n".into()),
                TokenKind::Keyword("start".into()),
                TokenKind::Symbol("true".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            kinds("; header\n(jump 0) ; trailing"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Symbol("jump".into()),
                TokenKind::Int(0),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn positions_are_one_indexed() {
        let tokens = Scanner::new("(a)\n(b)").scan_tokens().unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 1));
    }

    #[test]
    fn unterminated_string_is_rejected() {
        assert!(Scanner::new("\"oops").scan_tokens().is_err());
    }
}
