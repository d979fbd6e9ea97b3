//! # turlex - SIMD-Accelerated SQL Tokenizer
//!
//! turlex transforms a read-only byte buffer holding SQL source text into a
//! sequence of tagged tokens: keywords, identifiers, numbers, string
//! literals, operators, delimiters and comments, each annotated with the
//! 1-based line and column where it begins. This implementation prioritizes:
//!
//! - **Zero-copy tokenization**: token values are borrowed slices of the
//!   input; the tokenizer never copies buffer content
//! - **O(1) byte classification**: a 256-entry, cache-line-aligned lookup
//!   table replaces branchy range comparisons
//! - **SIMD whitespace skipping**: runtime dispatch across AVX-512 / AVX2 /
//!   SSE4.2 / SSSE3 / SSE2 / NEON tiers, with a scalar fallback
//!
//! ## Quick Start
//!
//! ```
//! use turlex::{TokenKind, Tokenizer};
//!
//! let sql = b"SELECT id, name FROM users WHERE active = true";
//! let mut tokenizer = Tokenizer::new(sql);
//!
//! let tokens = tokenizer.tokenize();
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! assert_eq!(tokens[0].value, b"SELECT");
//! assert_eq!(tokens[0].line, 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │       Tokenizer (stream assembly)         │
//! ├──────────────────────┬────────────────────┤
//! │  SIMD Dispatcher     │  Scalar Lexer Core │
//! │  (whitespace skip)   │  (one lexeme/call) │
//! ├──────────────────────┴────────────────────┤
//! │ Classification Table │ Keyword Dictionary │
//! └───────────────────────────────────────────┘
//! ```
//!
//! The assembler loop alternates between the vectorized whitespace skip and
//! the scalar core; the core consults the classification table for every
//! byte and the keyword dictionary once per identifier-shaped lexeme.
//!
//! ## Malformed Input
//!
//! Tokenization has no failure mode. Unterminated strings and comments
//! extend to end of input; unclassified bytes become single-byte operator
//! tokens; over-long operator runs split into their longest recognized
//! prefixes. Deciding whether the token sequence is legal SQL belongs to
//! the parser, not here.
//!
//! ## Module Overview
//!
//! - [`charclass`]: byte classification flags, table and predicates
//! - [`keyword`]: canonical keyword ids and the perfect-hash dictionary
//! - [`token`]: token and token-kind definitions
//! - [`simd`]: per-tier whitespace scanners and the runtime dispatcher
//! - [`tokenizer`]: the lexer core and token stream assembly

pub mod charclass;
pub mod keyword;
pub mod simd;
pub mod token;
pub mod tokenizer;

pub use keyword::{find_keyword, Keyword};
pub use simd::{SimdDispatcher, SimdLevel};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
