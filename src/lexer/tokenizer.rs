//! The hand-written tokenizer.
//!
//! Unrecognized characters are skipped silently rather than rejected,
//! matching the behavior of the reference tokenizer this one was built
//! from. The one place this implementation is stricter is a string
//! literal left unterminated at end-of-input, which is a hard error
//! here even though the original scanner let it pass through silently.

use crate::parser::error::SyntaxError;

use super::{Keyword, Span, Token, TokenKind};

/// Scans SQL source text into a stream of [`Token`]s.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn scan_identifier(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        let upper = text.to_ascii_uppercase();
        match Keyword::from_str(&upper) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    fn scan_number(&mut self) -> Token {
        let mut is_float = false;

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[self.start..self.pos];

        if is_float {
            let value: f64 = text.parse().expect("scanned only digits and one dot");
            self.make_token(TokenKind::Float(value))
        } else {
            let value: i64 = text.parse().expect("scanned only ASCII digits");
            self.make_token(TokenKind::Integer(value))
        }
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, SyntaxError> {
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(SyntaxError::new(
                        "unterminated string literal",
                        self.make_span(),
                    ));
                }
            }
        }

        Ok(self.make_token(TokenKind::String(value)))
    }

    /// Scans the next token, or returns `None` once end-of-input is reached.
    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        match c {
            '(' => {
                self.advance();
                Ok(self.make_token(TokenKind::LeftParen))
            }
            ')' => {
                self.advance();
                Ok(self.make_token(TokenKind::RightParen))
            }
            ',' => {
                self.advance();
                Ok(self.make_token(TokenKind::Comma))
            }
            ';' => {
                self.advance();
                Ok(self.make_token(TokenKind::Semicolon))
            }
            '*' => {
                self.advance();
                Ok(self.make_token(TokenKind::Star))
            }
            '.' => {
                self.advance();
                Ok(self.make_token(TokenKind::Dot))
            }
            '=' => {
                self.advance();
                Ok(self.make_token(TokenKind::Eq))
            }
            '<' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::LtEq))
                } else if self.peek() == Some('>') {
                    self.advance();
                    Ok(self.make_token(TokenKind::NotEq))
                } else {
                    Ok(self.make_token(TokenKind::Lt))
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::GtEq))
                } else {
                    Ok(self.make_token(TokenKind::Gt))
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(self.make_token(TokenKind::NotEq))
                } else {
                    // Not a recognized operator on its own; skip it silently
                    // and keep scanning, matching the reference tokenizer.
                    self.next_token()
                }
            }
            '\'' => self.scan_string('\''),
            '"' => self.scan_string('"'),
            c if c.is_ascii_digit() => Ok(self.scan_number()),
            c if c == '-' && self.peek_next().is_some_and(|n| n.is_ascii_digit()) => {
                self.advance();
                let mut tok = self.scan_number();
                tok.span = self.make_span();
                match &mut tok.kind {
                    TokenKind::Integer(i) => *i = -*i,
                    TokenKind::Float(f) => *f = -*f,
                    _ => {}
                }
                Ok(tok)
            }
            c if c.is_alphabetic() || c == '_' => Ok(self.scan_identifier()),
            _ => {
                // Unrecognized character: skip it and keep scanning.
                self.advance();
                self.next_token()
            }
        }
    }

    /// Tokenizes the entire input, returning every token up to and
    /// including the trailing `Eof`.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if a string literal is left unterminated.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
