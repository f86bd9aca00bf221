//! MiniC lexer: converts source bytes into tokens.
//!
//! The scanner works on raw bytes because token positions are byte offsets.
//! Lexical errors never abort the scan: an unrecognized byte is reported and
//! skipped, and tokenization continues.

use minic_syntax::diag::Diagnostics;
use minic_syntax::token::{Token, TokenKind};

/// Operator and punctuation lexemes in matching priority order. The
/// two-character operators precede their one-character prefixes, so the
/// first prefix match is also the longest.
const OPERATORS: [(&str, TokenKind); 21] = [
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::LessEq),
    (">=", TokenKind::GreaterEq),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    (",", TokenKind::Comma),
    ("=", TokenKind::Equal),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("!", TokenKind::Bang),
];

fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "return" => TokenKind::Return,
        "func" => TokenKind::Func,
        "var" => TokenKind::Var,
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "bool" => TokenKind::Bool,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "print" => TokenKind::Print,
        _ => return None,
    };
    Some(kind)
}

/// Byte scanner that produces position-tagged tokens.
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    diag: Diagnostics,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer over the given source bytes.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            diag: Diagnostics::new(),
        }
    }

    /// Tokenize the entire input, returning the token stream and the
    /// lexical diagnostics.
    pub fn tokenize(mut self) -> (Vec<Token>, Diagnostics) {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            if c == b'\n' {
                self.line += 1;
                self.pos += 1;
                continue;
            }
            if c.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            // line comment, consumed up to but not including the newline
            if c == b'/' && self.peek_at(1) == Some(b'/') {
                while let Some(c) = self.peek() {
                    if c == b'\n' {
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            if let Some(tok) = self.match_operator() {
                tokens.push(tok);
                continue;
            }
            if c.is_ascii_digit() {
                tokens.push(self.read_number());
                continue;
            }
            if c.is_ascii_alphabetic() || c == b'_' {
                tokens.push(self.read_ident_or_keyword());
                continue;
            }
            self.diag.error(format!(
                "Illegal character '{}' at line {}",
                c as char, self.line
            ));
            self.pos += 1;
        }
        (tokens, self.diag)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn lexeme(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    fn match_operator(&mut self) -> Option<Token> {
        let rest = &self.src[self.pos..];
        for (lexeme, kind) in OPERATORS {
            if rest.starts_with(lexeme.as_bytes()) {
                let tok = Token {
                    kind,
                    text: lexeme.to_string(),
                    line: self.line,
                    pos: self.pos,
                };
                self.pos += lexeme.len();
                return Some(tok);
            }
        }
        None
    }

    /// A maximal run of digits and dots starting at a digit. Any dot makes
    /// it a float lexeme; multiple dots are not rejected here (the evaluator
    /// falls back to 0.0 on a lexeme it cannot parse).
    fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut has_dot = false;
        while let Some(c) = self.peek() {
            if c == b'.' {
                has_dot = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.pos += 1;
        }
        Token {
            kind: if has_dot {
                TokenKind::FloatNum
            } else {
                TokenKind::Number
            },
            text: self.lexeme(start),
            line: self.line,
            pos: start,
        }
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text = self.lexeme(start);
        let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            text,
            line: self.line,
            pos: start,
        }
    }
}
