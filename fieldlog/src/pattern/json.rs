// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::encode;
use crate::Pattern;

/// Writes each record as a single-line JSON object.
///
/// Integers written in a radix other than 10 are quoted so the record remains
/// valid JSON.
#[derive(Copy, Clone, Debug, Default)]
pub struct JsonPattern;

impl Pattern for JsonPattern {
    fn init(&self, buf: &mut Vec<u8>) {
        buf.push(b'{');
    }

    fn append_key(&self, buf: &mut Vec<u8>, key: &str) {
        buf.push(b'"');
        encode::escape(buf, key.as_bytes());
        buf.extend_from_slice(b"\":");
    }

    fn append_str(&self, buf: &mut Vec<u8>, value: &str) {
        self.append_bytes(buf, value.as_bytes());
    }

    fn append_bytes(&self, buf: &mut Vec<u8>, value: &[u8]) {
        buf.push(b'"');
        encode::escape(buf, value);
        buf.extend_from_slice(b"\",");
    }

    fn append_i64(&self, buf: &mut Vec<u8>, value: i64, radix: u32) {
        if radix == 10 {
            encode::signed(buf, value, radix);
        } else {
            buf.push(b'"');
            encode::signed(buf, value, radix);
            buf.push(b'"');
        }
        buf.push(b',');
    }

    fn append_u64(&self, buf: &mut Vec<u8>, value: u64, radix: u32) {
        if radix == 10 {
            encode::unsigned(buf, value, radix);
        } else {
            buf.push(b'"');
            encode::unsigned(buf, value, radix);
            buf.push(b'"');
        }
        buf.push(b',');
    }

    fn append_f64(&self, buf: &mut Vec<u8>, value: f64) {
        encode::float(buf, value);
        buf.push(b',');
    }

    fn append_f32(&self, buf: &mut Vec<u8>, value: f32) {
        encode::float(buf, value);
        buf.push(b',');
    }

    fn append_raw(&self, buf: &mut Vec<u8>, value: &[u8]) {
        buf.extend_from_slice(value);
        buf.push(b',');
    }

    /// Replaces the separator left by the last field with the closing brace.
    ///
    /// The record must contain at least one field.
    fn complete(&self, buf: &mut Vec<u8>) {
        debug_assert_eq!(buf.last(), Some(&b','), "record has no fields");
        if let Some(last) = buf.last_mut() {
            *last = b'}';
        }
        buf.push(b'\n');
    }
}
