// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Byte-level encoders shared by every pattern.

use core::fmt::Display;
use std::io::Write;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// bytes in 0x20..=0x7e, other than the quote and backslash, are copied as-is
static NO_ESCAPE: [bool; 256] = {
    let mut table = [false; 256];
    let mut i = 0x20;
    while i <= 0x7e {
        table[i] = i != b'"' as usize && i != b'\\' as usize;
        i += 1;
    }
    table
};

/// Appends `value` to `buf` with control characters, quotes, and backslashes
/// escaped. Valid multi-byte UTF-8 sequences are copied verbatim and each
/// invalid sequence is replaced with a `\ufffd` escape.
pub(crate) fn escape(buf: &mut Vec<u8>, value: &[u8]) {
    for chunk in value.utf8_chunks() {
        escape_valid(buf, chunk.valid().as_bytes());

        if !chunk.invalid().is_empty() {
            buf.extend_from_slice(b"\\ufffd");
        }
    }
}

fn escape_valid(buf: &mut Vec<u8>, s: &[u8]) {
    let mut start = 0;

    for (i, &b) in s.iter().enumerate() {
        // non-ascii bytes belong to valid sequences here and are copied
        if NO_ESCAPE[b as usize] || b >= 0x80 {
            continue;
        }

        buf.extend_from_slice(&s[start..i]);
        match b {
            b'"' | b'\\' => buf.extend_from_slice(&[b'\\', b]),
            0x08 => buf.extend_from_slice(b"\\b"),
            0x0c => buf.extend_from_slice(b"\\f"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            _ => buf.extend_from_slice(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                DIGITS[(b >> 4) as usize],
                DIGITS[(b & 0xf) as usize],
            ]),
        }
        start = i + 1;
    }

    buf.extend_from_slice(&s[start..]);
}

/// Appends `value` in the given radix. Negative values are written as a minus
/// sign followed by the magnitude.
pub(crate) fn signed(buf: &mut Vec<u8>, value: i64, radix: u32) {
    if value < 0 {
        buf.push(b'-');
    }
    unsigned(buf, value.unsigned_abs(), radix);
}

/// Appends `value` in the given radix, which must be in `2..=36`.
pub(crate) fn unsigned(buf: &mut Vec<u8>, mut value: u64, radix: u32) {
    debug_assert!((2..=36).contains(&radix), "radix out of range: {radix}");
    let radix = radix.clamp(2, 36) as u64;

    // u64::MAX in base 2 needs 64 digits
    let mut digits = [0_u8; 64];
    let mut pos = digits.len();

    loop {
        pos -= 1;
        digits[pos] = DIGITS[(value % radix) as usize];
        value /= radix;
        if value == 0 {
            break;
        }
    }

    buf.extend_from_slice(&digits[pos..]);
}

/// Appends a float using its shortest round-trip representation. NaN and the
/// infinities are written as the quoted tokens `"NaN"`, `"+Inf"`, `"-Inf"`.
pub(crate) fn float<F: Display + Into<f64> + Copy>(buf: &mut Vec<u8>, value: F) {
    let wide: f64 = value.into();

    if wide.is_nan() {
        buf.extend_from_slice(b"\"NaN\"");
    } else if wide == f64::INFINITY {
        buf.extend_from_slice(b"\"+Inf\"");
    } else if wide == f64::NEG_INFINITY {
        buf.extend_from_slice(b"\"-Inf\"");
    } else {
        // writing to a Vec does not fail
        let _ = write!(buf, "{value}");
    }
}
