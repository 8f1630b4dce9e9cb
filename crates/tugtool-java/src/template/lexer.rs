// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for template snippets.
//!
//! Every token carries the whitespace and comments in front of it as a
//! [`Space`], so the parser can hand that spacing to the node the token
//! starts and snippets print back the way they were written.
//!
//! `>` is always a token of its own; the parser joins adjacent `>` tokens
//! into shift operators so that nested type arguments close cleanly.

use tugtool_core::error::TemplateCompilationError;
use tugtool_core::text::byte_offset_to_position_str;
use tugtool_java_cst::{Comment, Space};

/// Kinds of literal the snippet language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    Literal(String, LiteralKind),
    /// Body of `#{...}` without the delimiters.
    Placeholder(String),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub prefix: Space,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(self.kind, TokenKind::Punct(p) if p == punct)
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(name) if name == keyword)
    }
}

/// Multi-character punctuation first, so the longest match wins.
const PUNCTUATION: &[&str] = &[
    "<<", "<=", "==", "!=", "&&", "||", "++", "--", "...", "(", ")", "{", "}", "[", "]", ";",
    ",", ".", "@", "?", ":", "=", "<", ">", "+", "-", "*", "/", "%", "!", "~", "&", "|", "^",
];

pub(crate) fn syntax_error(source: &str, offset: usize, message: impl Into<String>) -> TemplateCompilationError {
    let (line, column) = byte_offset_to_position_str(source, offset);
    TemplateCompilationError::Syntax {
        line,
        column,
        message: message.into(),
    }
}

/// Split `source` into tokens, ending with [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, TemplateCompilationError> {
    let mut lexer = Lexer { source, pos: 0 };
    let mut tokens = Vec::new();
    loop {
        let prefix = lexer.space()?;
        let offset = lexer.pos;
        let kind = lexer.token()?;
        let done = kind == TokenKind::Eof;
        tokens.push(Token {
            kind,
            prefix,
            offset,
        });
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn whitespace(&mut self) -> String {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        rest[..len].to_string()
    }

    /// Whitespace and comments up to the next token.
    fn space(&mut self) -> Result<Space, TemplateCompilationError> {
        let whitespace = self.whitespace();
        let mut comments = Vec::new();
        loop {
            let rest = self.rest();
            let comment = if let Some(body) = rest.strip_prefix("//") {
                let len = body.find('\n').unwrap_or(body.len());
                self.pos += 2 + len;
                Comment {
                    text: body[..len].to_string(),
                    multiline: false,
                    suffix: String::new(),
                }
            } else if let Some(body) = rest.strip_prefix("/*") {
                let len = body
                    .find("*/")
                    .ok_or_else(|| syntax_error(self.source, self.pos, "unterminated comment"))?;
                self.pos += 4 + len;
                Comment {
                    text: body[..len].to_string(),
                    multiline: true,
                    suffix: String::new(),
                }
            } else {
                break;
            };
            let suffix = self.whitespace();
            comments.push(Comment { suffix, ..comment });
        }
        Ok(Space {
            whitespace,
            comments,
        })
    }

    fn token(&mut self) -> Result<TokenKind, TemplateCompilationError> {
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(TokenKind::Eof);
        };

        if let Some(body) = self.rest().strip_prefix("#{") {
            let end = body
                .find('}')
                .ok_or_else(|| syntax_error(self.source, start, "unterminated placeholder"))?;
            self.pos += 2 + end + 1;
            return Ok(TokenKind::Placeholder(body[..end].trim().to_string()));
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let rest = self.rest();
            let len = rest
                .char_indices()
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            self.pos += len;
            let word = &rest[..len];
            return Ok(match word {
                "true" | "false" => TokenKind::Literal(word.to_string(), LiteralKind::Boolean),
                "null" => TokenKind::Literal(word.to_string(), LiteralKind::Null),
                _ => TokenKind::Ident(word.to_string()),
            });
        }

        if c.is_ascii_digit() {
            return Ok(self.number());
        }

        if c == '"' || c == '\'' {
            return self.quoted(c);
        }

        for punct in PUNCTUATION {
            if self.rest().starts_with(punct) {
                self.pos += punct.len();
                return Ok(TokenKind::Punct(punct));
            }
        }

        Err(syntax_error(
            self.source,
            start,
            format!("unexpected character `{}`", c),
        ))
    }

    fn number(&mut self) -> TokenKind {
        let rest = self.rest();
        let mut len = 0;
        let mut kind = LiteralKind::Int;
        let bytes = rest.as_bytes();
        while len < bytes.len() {
            let b = bytes[len];
            if b.is_ascii_alphanumeric() || b == b'_' {
                len += 1;
            } else if b == b'.' && bytes.get(len + 1).is_some_and(u8::is_ascii_digit) {
                kind = LiteralKind::Double;
                len += 1;
            } else {
                break;
            }
        }
        let text = &rest[..len];
        let hex = text.starts_with("0x") || text.starts_with("0X");
        kind = match text.chars().last() {
            Some('L' | 'l') => LiteralKind::Long,
            Some('F' | 'f') if !hex => LiteralKind::Float,
            Some('D' | 'd') if !hex => LiteralKind::Double,
            _ => kind,
        };
        self.pos += len;
        TokenKind::Literal(text.to_string(), kind)
    }

    fn quoted(&mut self, quote: char) -> Result<TokenKind, TemplateCompilationError> {
        let start = self.pos;
        let mut escaped = false;
        for (i, c) in self.rest().char_indices().skip(1) {
            match c {
                '\\' if !escaped => escaped = true,
                '\n' => break,
                c if c == quote && !escaped => {
                    let end = start + i + c.len_utf8();
                    let text = self.source[start..end].to_string();
                    self.pos = end;
                    let kind = if quote == '"' {
                        LiteralKind::String
                    } else {
                        LiteralKind::Char
                    };
                    return Ok(TokenKind::Literal(text, kind));
                }
                _ => escaped = false,
            }
        }
        Err(syntax_error(self.source, start, "unterminated literal"))
    }
}
