//! # SIMD-Accelerated Whitespace Scanning
//!
//! This module provides the vectorized "count the leading whitespace prefix"
//! primitive that sits on the hottest path of the tokenizer: between any two
//! tokens the input typically holds a short run of spaces, tabs or newlines,
//! and skipping that run dominates the cost of token boundary detection.
//!
//! ## Contract
//!
//! `skip_whitespace(bytes) -> n` returns the number of leading bytes that
//! are SQL whitespace (space, tab, newline, carriage return). `n` may be 0
//! (first byte is not whitespace) or `bytes.len()` (the whole slice is).
//! No implementation reads past the end of the slice.
//!
//! ## Implementations
//!
//! The module provides one implementation per instruction-set tier, selected
//! at runtime based on CPU capability:
//!
//! | Architecture | ISA       | Lane width | Mask width |
//! |--------------|-----------|------------|------------|
//! | x86_64       | AVX-512BW | 64 bytes   | 64-bit     |
//! | x86_64       | AVX2      | 32 bytes   | 32-bit     |
//! | x86_64       | SSE4.2    | 16 bytes   | 16-bit     |
//! | x86_64       | SSSE3     | 16 bytes   | 16-bit     |
//! | x86_64       | SSE2      | 16 bytes   | 16-bit     |
//! | aarch64      | NEON      | 16 bytes   | reduction  |
//! | any          | Scalar    | 1 byte     | —          |
//!
//! Each x86 tier compares a lane against the four whitespace bytes, ORs the
//! compare results, derives a byte mask, and advances by the count of
//! trailing whitespace bits; the first lane containing a non-whitespace byte
//! ends the scan. The three SSE tiers share one 16-byte kernel recompiled
//! per target feature. NEON has no movemask, so it detects a non-whitespace
//! byte with a cross-lane max reduction and locates it with a short byte
//! walk. Tails narrower than a lane fall back to the scalar loop.
//!
//! The tiers are optimizations, not features: every implementation is
//! byte-for-byte equivalent to [`skip_whitespace_scalar`], and the test
//! suite pins that equivalence on lane-boundary-straddling inputs.
//!
//! ## Dispatch
//!
//! [`SimdDispatcher`] probes CPU feature bits once per process (cached in a
//! `OnceLock`) and stores a plain function pointer to the selected tier.
//! Per call there is only the indirect call, no branching.
//!
//! ## Thread Safety
//!
//! All scanners are pure functions over borrowed data; the cached probe
//! result is written through a one-shot initializer. Everything here is
//! safe to use concurrently from any number of threads.

use crate::charclass::is_whitespace;
use std::sync::OnceLock;

/// Instruction-set tier of a whitespace scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    Avx512,
    Avx2,
    Sse42,
    Ssse3,
    Sse2,
    Neon,
    Scalar,
}

impl SimdLevel {
    /// Human-readable tag for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            SimdLevel::Avx512 => "AVX512",
            SimdLevel::Avx2 => "AVX2",
            SimdLevel::Sse42 => "SSE4.2",
            SimdLevel::Ssse3 => "SSSE3",
            SimdLevel::Sse2 => "SSE2",
            SimdLevel::Neon => "NEON",
            SimdLevel::Scalar => "Scalar",
        }
    }
}

pub type SkipWhitespaceFn = fn(&[u8]) -> usize;

pub fn skip_whitespace_scalar(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() && is_whitespace(bytes[i]) {
        i += 1;
    }
    i
}

/// Shared 16-byte kernel for the three SSE tiers. Inlined into wrappers that
/// carry the per-tier `target_feature`, so each tier is compiled with its
/// own instruction set enabled.
///
/// # Safety
///
/// Caller must ensure SSE2 is available.
#[cfg(target_arch = "x86_64")]
#[inline(always)]
unsafe fn skip_whitespace_m128(bytes: &[u8]) -> usize {
    use std::arch::x86_64::*;

    let len = bytes.len();
    let space = _mm_set1_epi8(b' ' as i8);
    let tab = _mm_set1_epi8(b'\t' as i8);
    let lf = _mm_set1_epi8(b'\n' as i8);
    let cr = _mm_set1_epi8(b'\r' as i8);

    let mut i = 0;
    while i + 16 <= len {
        let chunk = _mm_loadu_si128(bytes.as_ptr().add(i) as *const __m128i);

        let ws = _mm_or_si128(
            _mm_or_si128(_mm_cmpeq_epi8(chunk, space), _mm_cmpeq_epi8(chunk, tab)),
            _mm_or_si128(_mm_cmpeq_epi8(chunk, lf), _mm_cmpeq_epi8(chunk, cr)),
        );
        let mask = _mm_movemask_epi8(ws) as u32;

        if mask != 0xFFFF {
            return i + mask.trailing_ones() as usize;
        }
        i += 16;
    }

    i + skip_whitespace_scalar(&bytes[i..])
}

/// # Safety
///
/// Requires an x86_64 CPU with SSE2 support (checked via feature probe
/// before dispatch).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
pub unsafe fn skip_whitespace_sse2(bytes: &[u8]) -> usize {
    skip_whitespace_m128(bytes)
}

/// # Safety
///
/// Requires an x86_64 CPU with SSSE3 support.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "ssse3")]
pub unsafe fn skip_whitespace_ssse3(bytes: &[u8]) -> usize {
    skip_whitespace_m128(bytes)
}

/// # Safety
///
/// Requires an x86_64 CPU with SSE4.2 support.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.2")]
pub unsafe fn skip_whitespace_sse42(bytes: &[u8]) -> usize {
    skip_whitespace_m128(bytes)
}

/// # Safety
///
/// Requires an x86_64 CPU with AVX2 support.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn skip_whitespace_avx2(bytes: &[u8]) -> usize {
    use std::arch::x86_64::*;

    let len = bytes.len();
    let space = _mm256_set1_epi8(b' ' as i8);
    let tab = _mm256_set1_epi8(b'\t' as i8);
    let lf = _mm256_set1_epi8(b'\n' as i8);
    let cr = _mm256_set1_epi8(b'\r' as i8);

    let mut i = 0;
    while i + 32 <= len {
        let chunk = _mm256_loadu_si256(bytes.as_ptr().add(i) as *const __m256i);

        let ws = _mm256_or_si256(
            _mm256_or_si256(
                _mm256_cmpeq_epi8(chunk, space),
                _mm256_cmpeq_epi8(chunk, tab),
            ),
            _mm256_or_si256(_mm256_cmpeq_epi8(chunk, lf), _mm256_cmpeq_epi8(chunk, cr)),
        );
        let mask = _mm256_movemask_epi8(ws) as u32;

        if mask != u32::MAX {
            return i + mask.trailing_ones() as usize;
        }
        i += 32;
    }

    i + skip_whitespace_scalar(&bytes[i..])
}

/// # Safety
///
/// Requires an x86_64 CPU with AVX-512BW support (byte-granular compares
/// producing a 64-bit mask).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx512bw")]
pub unsafe fn skip_whitespace_avx512(bytes: &[u8]) -> usize {
    use std::arch::x86_64::*;

    let len = bytes.len();
    let space = _mm512_set1_epi8(b' ' as i8);
    let tab = _mm512_set1_epi8(b'\t' as i8);
    let lf = _mm512_set1_epi8(b'\n' as i8);
    let cr = _mm512_set1_epi8(b'\r' as i8);

    let mut i = 0;
    while i + 64 <= len {
        let chunk = _mm512_loadu_si512(bytes.as_ptr().add(i).cast());

        let mask: u64 = _mm512_cmpeq_epi8_mask(chunk, space)
            | _mm512_cmpeq_epi8_mask(chunk, tab)
            | _mm512_cmpeq_epi8_mask(chunk, lf)
            | _mm512_cmpeq_epi8_mask(chunk, cr);

        if mask != u64::MAX {
            return i + mask.trailing_ones() as usize;
        }
        i += 64;
    }

    i + skip_whitespace_scalar(&bytes[i..])
}

/// # Safety
///
/// Requires an aarch64 CPU with NEON support (standard on all aarch64
/// processors).
#[cfg(target_arch = "aarch64")]
pub unsafe fn skip_whitespace_neon(bytes: &[u8]) -> usize {
    use std::arch::aarch64::*;

    let len = bytes.len();
    let space = vdupq_n_u8(b' ');
    let tab = vdupq_n_u8(b'\t');
    let lf = vdupq_n_u8(b'\n');
    let cr = vdupq_n_u8(b'\r');

    let mut i = 0;
    while i + 16 <= len {
        let chunk = vld1q_u8(bytes.as_ptr().add(i));

        let ws = vorrq_u8(
            vorrq_u8(vceqq_u8(chunk, space), vceqq_u8(chunk, tab)),
            vorrq_u8(vceqq_u8(chunk, lf), vceqq_u8(chunk, cr)),
        );

        // max-across the negated mask: nonzero iff the lane holds a
        // non-whitespace byte, which a short walk then locates
        if vmaxvq_u8(vmvnq_u8(ws)) != 0 {
            let mut j = 0;
            while is_whitespace(bytes[i + j]) {
                j += 1;
            }
            return i + j;
        }
        i += 16;
    }

    i + skip_whitespace_scalar(&bytes[i..])
}

#[cfg(target_arch = "x86_64")]
fn skip_avx512(bytes: &[u8]) -> usize {
    // SAFETY: selected only after the avx512bw probe succeeds
    unsafe { skip_whitespace_avx512(bytes) }
}

#[cfg(target_arch = "x86_64")]
fn skip_avx2(bytes: &[u8]) -> usize {
    // SAFETY: selected only after the avx2 probe succeeds
    unsafe { skip_whitespace_avx2(bytes) }
}

#[cfg(target_arch = "x86_64")]
fn skip_sse42(bytes: &[u8]) -> usize {
    // SAFETY: selected only after the sse4.2 probe succeeds
    unsafe { skip_whitespace_sse42(bytes) }
}

#[cfg(target_arch = "x86_64")]
fn skip_ssse3(bytes: &[u8]) -> usize {
    // SAFETY: selected only after the ssse3 probe succeeds
    unsafe { skip_whitespace_ssse3(bytes) }
}

#[cfg(target_arch = "x86_64")]
fn skip_sse2(bytes: &[u8]) -> usize {
    // SAFETY: selected only after the sse2 probe succeeds
    unsafe { skip_whitespace_sse2(bytes) }
}

#[cfg(target_arch = "aarch64")]
fn skip_neon(bytes: &[u8]) -> usize {
    // SAFETY: NEON is architecturally guaranteed on aarch64
    unsafe { skip_whitespace_neon(bytes) }
}

fn detect_level() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512bw") {
            return SimdLevel::Avx512;
        }
        if is_x86_feature_detected!("avx2") {
            return SimdLevel::Avx2;
        }
        if is_x86_feature_detected!("sse4.2") {
            return SimdLevel::Sse42;
        }
        if is_x86_feature_detected!("ssse3") {
            return SimdLevel::Ssse3;
        }
        if is_x86_feature_detected!("sse2") {
            return SimdLevel::Sse2;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return SimdLevel::Neon;
    }

    #[allow(unreachable_code)]
    SimdLevel::Scalar
}

/// Probes CPU capability once per process; later callers read the cache.
pub fn detected_level() -> SimdLevel {
    static LEVEL: OnceLock<SimdLevel> = OnceLock::new();
    *LEVEL.get_or_init(detect_level)
}

/// Routes whitespace scans to the best tier the CPU supports.
///
/// The selection is fixed at construction; `skip_whitespace` is a single
/// indirect call with no further branching.
#[derive(Debug, Clone, Copy)]
pub struct SimdDispatcher {
    level: SimdLevel,
    skip_fn: SkipWhitespaceFn,
}

impl SimdDispatcher {
    pub fn new() -> Self {
        let level = detected_level();
        let skip_fn: SkipWhitespaceFn = match level {
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx512 => skip_avx512,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Avx2 => skip_avx2,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse42 => skip_sse42,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Ssse3 => skip_ssse3,
            #[cfg(target_arch = "x86_64")]
            SimdLevel::Sse2 => skip_sse2,
            #[cfg(target_arch = "aarch64")]
            SimdLevel::Neon => skip_neon,
            _ => skip_whitespace_scalar,
        };
        Self { level, skip_fn }
    }

    #[inline]
    pub fn skip_whitespace(&self, bytes: &[u8]) -> usize {
        (self.skip_fn)(bytes)
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }

    pub fn level_name(&self) -> &'static str {
        self.level.name()
    }
}

impl Default for SimdDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
