//! Lexer for the Java subset emitted by Avro codegen.
//!
//! The lexer converts source text into a stream of byte-offset tokens.
//! Comments are kept as trivia tokens so Javadoc blocks can be attached to
//! the declarations that follow them; everything else the annotation pass
//! does not care about (operators, literals inside method bodies) still
//! tokenizes cleanly so balanced-delimiter skipping works.

use super::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords; the parser tells them apart by text.
    Ident,
    /// String literal, span includes the surrounding quotes.
    Str,
    /// Character literal.
    Char,
    /// Numeric literal.
    Number,
    LineComment,
    BlockComment,
    /// Any single punctuation or operator character.
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// Lexer over Java source text.
pub struct Lexer<'src> {
    source: &'src str,
    /// Current byte offset in source.
    position: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    /// Tokenizes the whole input, trivia included, ending with an Eof token.
    pub fn tokenize(source: &'src str) -> Vec<Token> {
        let mut lexer = Self::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        match c {
            '/' => match self.peek_char_at(1) {
                Some('/') => self.scan_line_comment(),
                Some('*') => self.scan_block_comment(),
                _ => self.punct(c),
            },
            '"' => self.scan_string(),
            '\'' => self.scan_char(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_ident_start(c) => self.scan_ident(),
            c => self.punct(c),
        }
    }

    // ========================================================================
    // SCANNERS
    // ========================================================================

    fn scan_line_comment(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance(c);
        }
        Token::new(TokenKind::LineComment, Span::new(start, self.position))
    }

    fn scan_block_comment(&mut self) -> Token {
        let start = self.position;
        self.advance('/');
        self.advance('*');
        while let Some(c) = self.peek_char() {
            if c == '*' && self.peek_char_at(1) == Some('/') {
                self.advance('*');
                self.advance('/');
                break;
            }
            self.advance(c);
        }
        Token::new(TokenKind::BlockComment, Span::new(start, self.position))
    }

    fn scan_string(&mut self) -> Token {
        let start = self.position;
        self.advance('"');
        while let Some(c) = self.peek_char() {
            self.advance(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.peek_char() {
                        self.advance(escaped);
                    }
                }
                '"' => break,
                _ => {}
            }
        }
        Token::new(TokenKind::Str, Span::new(start, self.position))
    }

    fn scan_char(&mut self) -> Token {
        let start = self.position;
        self.advance('\'');
        while let Some(c) = self.peek_char() {
            self.advance(c);
            match c {
                '\\' => {
                    if let Some(escaped) = self.peek_char() {
                        self.advance(escaped);
                    }
                }
                '\'' => break,
                _ => {}
            }
        }
        Token::new(TokenKind::Char, Span::new(start, self.position))
    }

    fn scan_number(&mut self) -> Token {
        // Coarse: hex/long/float suffixes all fold into one token. The parser
        // never inspects numeric text, it only needs a single token to step
        // over.
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' {
                self.advance(c);
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number, Span::new(start, self.position))
    }

    fn scan_ident(&mut self) -> Token {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.advance(c);
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident, Span::new(start, self.position))
    }

    fn punct(&mut self, c: char) -> Token {
        let start = self.position;
        self.advance(c);
        Token::new(TokenKind::Punct(c), Span::new(start, self.position))
    }

    // ========================================================================
    // CURSOR
    // ========================================================================

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance(c);
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.source[self.position..].chars().nth(offset)
    }

    fn advance(&mut self, c: char) {
        self.position += c.len_utf8();
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
