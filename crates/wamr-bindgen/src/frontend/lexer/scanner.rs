//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{BindgenError, BindgenResult, Span};
use logos::Logos;

/// Lexer for preprocessed header text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> BindgenResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(BindgenError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> BindgenResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> BindgenResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }
}
