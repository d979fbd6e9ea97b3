//! Fuzz testing for the tokenizer.
//!
//! Feeds arbitrary byte sequences through `tokenize` and checks that the
//! tokenizer never panics and that its core invariant holds: token values
//! plus the whitespace between them reproduce the input byte-for-byte, with
//! strictly increasing token starts.

#![no_main]

use libfuzzer_sys::fuzz_target;

use turlex::{TokenKind, Tokenizer};

fuzz_target!(|data: &[u8]| {
    let tokens = Tokenizer::new(data).tokenize();

    let base = data.as_ptr() as usize;
    let mut cursor = 0usize;

    for token in &tokens {
        assert!(!token.value.is_empty());
        assert!(token.kind != TokenKind::Whitespace);
        assert!(token.kind != TokenKind::EndOfFile);

        let start = token.value.as_ptr() as usize - base;
        assert!(start >= cursor, "overlapping or reordered tokens");

        for &b in &data[cursor..start] {
            assert!(
                matches!(b, b' ' | b'\t' | b'\n' | b'\r'),
                "non-whitespace byte elided between tokens"
            );
        }
        assert_eq!(&data[start..start + token.value.len()], token.value);

        cursor = start + token.value.len();
    }

    for &b in &data[cursor..] {
        assert!(matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }
});
