//! # SQL Tokenizer - Zero-Copy Lexical Analysis
//!
//! This module drives the scalar lexer core and assembles the output token
//! stream. The tokenizer consumes a read-only byte buffer and produces
//! tokens whose values are borrowed slices into that buffer; no input byte
//! is ever copied.
//!
//! ## Control Flow
//!
//! [`Tokenizer::tokenize`] loops: skip leading whitespace through the SIMD
//! dispatcher, then hand one lexeme to the scalar core. The core classifies
//! the first byte through the lookup table and routes to the matching
//! scanner:
//!
//! - identifier start -> identifier/keyword scanner (one dictionary probe)
//! - digit -> number scanner
//! - quote -> string scanner (quote character remembered for escapes)
//! - `--` -> line comment scanner
//! - `/*` -> block comment scanner
//! - anything else -> operator/delimiter scanner
//!
//! ## Position Tracking
//!
//! Every token records the 1-based line and column of its first byte.
//! Newlines inside strings and block comments advance the line counter; the
//! whitespace region skipped by SIMD is re-walked byte-by-byte to keep the
//! line/column pair exact (the vector primitive only reports a length).
//!
//! ## Malformed Input
//!
//! Tokenization never fails. Unterminated strings and block comments extend
//! to end of input and keep their kind; bytes with no character class come
//! out as single-byte Operator tokens; unrecognized multi-character operator
//! runs split into their longest recognized prefixes (`===` is `==` then
//! `=`). Semantic legality is the parser's problem.

use crate::charclass;
use crate::keyword::find_keyword;
use crate::simd::SimdDispatcher;
use crate::token::{Token, TokenKind};
use memchr::memchr;

/// Two-byte operator extension set. The pair is consumed as one token; any
/// longer run restarts tokenization at the following byte, so the first
/// maximal match wins (`<<<` splits as `<<` then `<`).
#[inline(always)]
fn is_operator_pair(first: u8, second: u8) -> bool {
    matches!(
        (first, second),
        (b'<', b'=' | b'>' | b'<')
            | (b'>', b'=' | b'>')
            | (b'!', b'=')
            | (b'=', b'=')
            | (b'|', b'|')
            | (b'&', b'&')
            | (b':', b':')
    )
}

/// Zero-copy SQL tokenizer over a borrowed byte buffer.
///
/// The buffer must outlive every token produced from it; the `'a` lifetime
/// enforces that relationship.
pub struct Tokenizer<'a> {
    input: &'a [u8],
    dispatcher: SimdDispatcher,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            dispatcher: SimdDispatcher::new(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Human tag of the SIMD tier whitespace scans are routed to.
    pub fn simd_level(&self) -> &'static str {
        self.dispatcher.level_name()
    }

    /// Consumes the full input and returns all non-whitespace tokens.
    ///
    /// The output never contains `Whitespace` or `EndOfFile` kinds; empty
    /// input yields an empty vector.
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity(self.input.len() / 8);

        while self.pos < self.input.len() {
            let skip = self.dispatcher.skip_whitespace(&self.input[self.pos..]);
            if skip > 0 {
                self.update_position(skip);
            }

            if self.pos >= self.input.len() {
                break;
            }

            let token = self.next_token();
            if token.kind == TokenKind::EndOfFile {
                break;
            }
            if token.kind != TokenKind::Whitespace {
                tokens.push(token);
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token<'a> {
        if self.pos >= self.input.len() {
            return Token {
                kind: TokenKind::EndOfFile,
                value: &self.input[self.input.len()..],
                keyword: None,
                line: self.line,
                column: self.column,
            };
        }

        let start = self.pos;
        let line = self.line;
        let column = self.column;
        let first = self.input[self.pos];

        if charclass::is_ident_start(first) {
            return self.scan_identifier_or_keyword(start, line, column);
        }

        if charclass::is_digit(first) {
            return self.scan_number(start, line, column);
        }

        if charclass::is_quote(first) {
            return self.scan_string(start, line, column, first);
        }

        if first == b'-' && self.input.get(self.pos + 1) == Some(&b'-') {
            return self.scan_line_comment(start, line, column);
        }

        if first == b'/' && self.input.get(self.pos + 1) == Some(&b'*') {
            return self.scan_block_comment(start, line, column);
        }

        self.scan_operator_or_delimiter(start, line, column)
    }

    fn scan_identifier_or_keyword(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        while self.pos < self.input.len() && charclass::is_ident_cont(self.input[self.pos]) {
            self.pos += 1;
            self.column += 1;
        }

        let value = &self.input[start..self.pos];
        let keyword = find_keyword(value);
        let kind = if keyword.is_some() {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token {
            kind,
            value,
            keyword,
            line,
            column,
        }
    }

    fn scan_number(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        let mut has_dot = false;
        let mut has_exp = false;

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if charclass::is_digit(b) {
                self.pos += 1;
                self.column += 1;
            } else if b == b'.' && !has_dot && !has_exp {
                has_dot = true;
                self.pos += 1;
                self.column += 1;
            } else if (b == b'e' || b == b'E') && !has_exp {
                has_exp = true;
                self.pos += 1;
                self.column += 1;

                // a single sign may follow the exponent marker directly;
                // digits after it are not required here
                if let Some(&sign) = self.input.get(self.pos) {
                    if sign == b'+' || sign == b'-' {
                        self.pos += 1;
                        self.column += 1;
                    }
                }
            } else {
                break;
            }
        }

        Token {
            kind: TokenKind::Number,
            value: &self.input[start..self.pos],
            keyword: None,
            line,
            column,
        }
    }

    fn scan_string(&mut self, start: usize, line: u32, column: u32, quote: u8) -> Token<'a> {
        self.pos += 1;
        self.column += 1;

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if b == quote {
                if self.input.get(self.pos + 1) == Some(&quote) {
                    // doubled quote escapes itself
                    self.pos += 2;
                    self.column += 2;
                } else {
                    self.pos += 1;
                    self.column += 1;
                    break;
                }
            } else if b == b'\n' {
                self.pos += 1;
                self.line += 1;
                self.column = 1;
            } else {
                self.pos += 1;
                self.column += 1;
            }
        }

        Token {
            kind: TokenKind::String,
            value: &self.input[start..self.pos],
            keyword: None,
            line,
            column,
        }
    }

    fn scan_line_comment(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        self.pos += 2;
        self.column += 2;

        // a line comment body cannot contain a newline, so the column walk
        // reduces to one addition once memchr finds the terminator
        match memchr(b'\n', &self.input[self.pos..]) {
            Some(offset) => {
                self.pos += offset + 1;
                self.line += 1;
                self.column = 1;
            }
            None => {
                self.column += (self.input.len() - self.pos) as u32;
                self.pos = self.input.len();
            }
        }

        Token {
            kind: TokenKind::Comment,
            value: &self.input[start..self.pos],
            keyword: None,
            line,
            column,
        }
    }

    fn scan_block_comment(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        self.pos += 2;
        self.column += 2;

        while self.pos < self.input.len() {
            let b = self.input[self.pos];

            if b == b'*' && self.input.get(self.pos + 1) == Some(&b'/') {
                self.pos += 2;
                self.column += 2;
                break;
            }

            if b == b'\n' {
                self.pos += 1;
                self.line += 1;
                self.column = 1;
            } else {
                self.pos += 1;
                self.column += 1;
            }
        }

        Token {
            kind: TokenKind::Comment,
            value: &self.input[start..self.pos],
            keyword: None,
            line,
            column,
        }
    }

    fn scan_operator_or_delimiter(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        let first = self.input[self.pos];
        self.pos += 1;
        self.column += 1;

        // bytes with an empty class land here too and come out as
        // single-byte Operator tokens
        let kind = if charclass::is_delimiter(first) {
            TokenKind::Delimiter
        } else {
            TokenKind::Operator
        };

        if let Some(&second) = self.input.get(self.pos) {
            if is_operator_pair(first, second) {
                self.pos += 1;
                self.column += 1;
            }
        }

        Token {
            kind,
            value: &self.input[start..self.pos],
            keyword: None,
            line,
            column,
        }
    }

    /// Walks a region the SIMD scanner skipped, keeping line/column exact.
    fn update_position(&mut self, count: usize) {
        for _ in 0..count {
            if self.input[self.pos] == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::Keyword;

    fn lex(input: &[u8]) -> Vec<Token<'_>> {
        Tokenizer::new(input).tokenize()
    }

    fn values<'a>(tokens: &[Token<'a>]) -> Vec<&'a [u8]> {
        tokens.iter().map(|t| t.value).collect()
    }

    #[test]
    fn lex_keywords_and_identifiers() {
        let tokens = lex(b"SELECT id FROM users");
        let expected: Vec<&[u8]> = vec![b"SELECT", b"id", b"FROM", b"users"];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].keyword, Some(Keyword::Select));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].keyword, None);
        assert_eq!(tokens[2].keyword, Some(Keyword::From));
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn lex_keywords_case_insensitive() {
        let tokens = lex(b"select Select sElEcT");
        for token in &tokens {
            assert_eq!(token.kind, TokenKind::Keyword);
            assert_eq!(token.keyword, Some(Keyword::Select));
        }
    }

    #[test]
    fn lex_numbers() {
        let tokens = lex(b"42 3.14 1.5e+3 2E-5 7e 1.e2");
        let expected: Vec<&[u8]> = vec![b"42", b"3.14", b"1.5e+3", b"2E-5", b"7e", b"1.e2"];
        assert_eq!(values(&tokens), expected);
        for token in &tokens {
            assert_eq!(token.kind, TokenKind::Number);
        }
    }

    #[test]
    fn number_dot_forbidden_after_exponent() {
        let tokens = lex(b"1e2.5");
        let expected: Vec<&[u8]> = vec![b"1e2", b".", b"5"];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[1].kind, TokenKind::Operator);
    }

    #[test]
    fn number_single_exponent_only() {
        let tokens = lex(b"1e2e3");
        // the second 'e' is not consumed by the number; it starts an
        // identifier
        let expected: Vec<&[u8]> = vec![b"1e2", b"e3"];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn lex_strings_with_escaped_quotes() {
        let tokens = lex(b"'it''s' \"col\"\"name\"");
        let expected: Vec<&[u8]> = vec![b"'it''s'", b"\"col\"\"name\""];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[1].kind, TokenKind::String);
    }

    #[test]
    fn unterminated_string_runs_to_end_of_input() {
        let tokens = lex(b"\"");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, b"\"");

        let tokens = lex(b"'abc");
        assert_eq!(tokens[0].value, b"'abc");
    }

    #[test]
    fn string_tracks_embedded_newlines() {
        let tokens = lex(b"'a\nb' x");
        assert_eq!(tokens[0].value, b"'a\nb'");
        assert_eq!(tokens[1].value, b"x");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[1].column, 4);
    }

    #[test]
    fn lex_line_comment() {
        let tokens = lex(b"a -- rest of line\nb");
        let expected: Vec<&[u8]> = vec![b"a", b"-- rest of line\n", b"b"];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].column, 1);
    }

    #[test]
    fn line_comment_without_newline_runs_to_end() {
        let tokens = lex(b"-- trailing");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].value, b"-- trailing");
    }

    #[test]
    fn lex_block_comment() {
        let tokens = lex(b"/* hi */ x");
        let expected: Vec<&[u8]> = vec![b"/* hi */", b"x"];
        assert_eq!(values(&tokens), expected);
        assert_eq!(tokens[0].kind, TokenKind::Comment);
    }

    #[test]
    fn block_comments_do_not_nest() {
        let tokens = lex(b"/* a /* b */ c");
        let expected: Vec<&[u8]> = vec![b"/* a /* b */", b"c"];
        assert_eq!(values(&tokens), expected);
    }

    #[test]
    fn unterminated_block_comment_runs_to_end_of_input() {
        let tokens = lex(b"/* open");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, b"/* open");

        // a lone trailing star is consumed too
        let tokens = lex(b"/* open *");
        assert_eq!(tokens[0].value, b"/* open *");
    }

    #[test]
    fn lex_compound_operators() {
        let tokens = lex(b"<= <> << >= >> != == || && ::");
        let expected: Vec<&[u8]> = vec![
            b"<=", b"<>", b"<<", b">=", b">>", b"!=", b"==", b"||", b"&&", b"::",
        ];
        assert_eq!(values(&tokens), expected);
        // :: starts with a delimiter byte, the rest with operator bytes
        assert_eq!(tokens[9].kind, TokenKind::Delimiter);
        assert_eq!(tokens[0].kind, TokenKind::Operator);
    }

    #[test]
    fn arrow_is_not_a_compound_operator() {
        let tokens = lex(b"a->b");
        let expected: Vec<&[u8]> = vec![b"a", b"-", b">", b"b"];
        assert_eq!(values(&tokens), expected);
    }

    #[test]
    fn lex_delimiters() {
        let tokens = lex(b"( ) , ; [ ] { }");
        for token in &tokens {
            assert_eq!(token.kind, TokenKind::Delimiter);
            assert_eq!(token.value.len(), 1);
        }
    }

    #[test]
    fn classless_bytes_become_single_operators() {
        let tokens = lex(b"? @ # $ \\");
        for token in &tokens {
            assert_eq!(token.kind, TokenKind::Operator);
            assert_eq!(token.value.len(), 1);
        }

        let tokens = lex(&[0x80, 0xff]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Operator);
        assert_eq!(tokens[1].kind, TokenKind::Operator);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(lex(b"").is_empty());
        assert!(lex(b"   \t\n\r  ").is_empty());
    }

    #[test]
    fn positions_across_simd_skipped_newlines() {
        let tokens = lex(b"a\n\n   b");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].column, 1);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[1].column, 4);
    }

    #[test]
    fn simd_level_reports_a_known_tier() {
        let tokenizer = Tokenizer::new(b"");
        assert!(matches!(
            tokenizer.simd_level(),
            "AVX512" | "AVX2" | "SSE4.2" | "SSSE3" | "SSE2" | "NEON" | "Scalar"
        ));
    }
}
