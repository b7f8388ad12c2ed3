//! Reading the textual form of a variable reference.
//! 变量引用文本形式的读取。

use lumen_common::Span;
use lumen_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};

use crate::VariableReference;

/// A token in a variable reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// `#`
    Hash,
    Ident(String),
    Unknown(char),
    Eof,
}

/// Converts reference text into tokens.
/// 将引用文本转换为 token。
pub struct Scanner<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Scan the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    fn next_token(&mut self) -> Token {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let Some((start, c)) = self.chars.next() else {
            let end = self.source.len();
            return Token {
                kind: TokenKind::Eof,
                span: Span::from_usize(end, end),
            };
        };

        let kind = match c {
            '#' => TokenKind::Hash,
            c if is_ident_start(c) => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) = self.chars.next_if(|(_, c)| is_ident_continue(*c)) {
                    end = i + c.len_utf8();
                }
                TokenKind::Ident(self.source[start..end].to_string())
            }
            c => TokenKind::Unknown(c),
        };

        let end = self.chars.peek().map_or(self.source.len(), |(i, _)| *i);
        Token {
            kind,
            span: Span::from_usize(start, end),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Parse `#name` into a variable reference node.
pub fn parse_reference(source: &str) -> Result<VariableReference, Diagnostic> {
    let tokens = Scanner::new(source).tokenize();
    let mut iter = tokens.into_iter();
    // `tokenize` always yields at least `Eof`.
    let mut next = move || {
        iter.next().unwrap_or(Token {
            kind: TokenKind::Eof,
            span: Span::from_usize(source.len(), source.len()),
        })
    };

    let hash = next();
    if hash.kind != TokenKind::Hash {
        return Err(syntax_error(hash.span, ErrorCode::MissingReferenceMarker, "expected `#`"));
    }

    let ident = next();
    let (name, ident_span) = match ident.kind {
        TokenKind::Ident(name) => (name, ident.span),
        TokenKind::Eof => {
            return Err(syntax_error(
                hash.span,
                ErrorCode::EmptyIdentifier,
                "expected a variable name after `#`",
            ));
        }
        TokenKind::Unknown(c) => {
            return Err(syntax_error(
                ident.span,
                ErrorCode::UnexpectedCharacter,
                format!("unexpected character `{}`", c),
            ));
        }
        TokenKind::Hash => {
            return Err(syntax_error(
                ident.span,
                ErrorCode::UnexpectedCharacter,
                "unexpected character `#`",
            ));
        }
    };

    let rest = next();
    if rest.kind != TokenKind::Eof {
        return Err(syntax_error(
            rest.span,
            ErrorCode::TrailingInput,
            "expected end of input after the variable name",
        ));
    }

    let span = hash.span.merge(ident_span);
    VariableReference::new(&name, span).map_err(|e| e.to_diagnostic(span))
}

impl VariableReference {
    /// Parse the textual form `#name`. See [`parse_reference`].
    pub fn parse(source: &str) -> Result<Self, Diagnostic> {
        parse_reference(source)
    }
}

fn syntax_error(span: Span, code: ErrorCode, label: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::Syntax, span, code.description())
        .with_code(code)
        .with_label(Label::new(span, label))
}
