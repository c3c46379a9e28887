// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Computed, Context, RuntimeCompute};

mod json;
mod line;

pub use json::JsonPattern;
pub use line::LinePattern;

/// The serialization format of a record.
///
/// A pattern holds no per-record state. Every method appends to a buffer owned
/// by the caller, which lets record templates be built once and copied for
/// each record.
///
/// Value methods write the value followed by whatever separator the format
/// places between fields, so a record is built as `init`, any number of
/// `append_key` and value pairs, then `complete`.
pub trait Pattern: Send + Sync {
    /// Write the token that opens a record.
    fn init(&self, buf: &mut Vec<u8>);

    /// Write a field name along with the separator between name and value.
    fn append_key(&self, buf: &mut Vec<u8>, key: &str);

    fn append_str(&self, buf: &mut Vec<u8>, value: &str);

    /// Write arbitrary bytes as a string value, replacing invalid UTF-8.
    fn append_bytes(&self, buf: &mut Vec<u8>, value: &[u8]);

    /// Write a signed integer in the given radix, which must be in `2..=36`.
    fn append_i64(&self, buf: &mut Vec<u8>, value: i64, radix: u32);

    /// Write an unsigned integer in the given radix, which must be in `2..=36`.
    fn append_u64(&self, buf: &mut Vec<u8>, value: u64, radix: u32);

    fn append_f64(&self, buf: &mut Vec<u8>, value: f64);

    fn append_f32(&self, buf: &mut Vec<u8>, value: f32);

    /// Write pre-encoded bytes verbatim as a value.
    fn append_raw(&self, buf: &mut Vec<u8>, value: &[u8]);

    fn append_bool(&self, buf: &mut Vec<u8>, value: bool) {
        if value {
            self.append_raw(buf, b"true");
        } else {
            self.append_raw(buf, b"false");
        }
    }

    /// Write the value of a runtime compute.
    fn append_computed(&self, buf: &mut Vec<u8>, value: &Computed) {
        match value {
            Computed::Text(text) => self.append_str(buf, text),
            Computed::Int(value) => self.append_i64(buf, *value, 10),
            Computed::Uint(value) => self.append_u64(buf, *value, 10),
        }
    }

    /// Evaluate a runtime compute and write it as a field. `buf` holds the
    /// opening token, the static fields, any earlier runtime values, and then
    /// the record's own fields, which are its last `fields` bytes. Those must
    /// still be the last bytes of `buf` when this returns.
    fn append_runtime(
        &self,
        buf: &mut Vec<u8>,
        fields: usize,
        compute: &dyn RuntimeCompute,
        context: &Context<'_>,
    ) {
        let start = buf.len() - fields;
        let value = compute.compute(context);
        self.append_key(buf, compute.name());
        self.append_computed(buf, &value);
        let added = buf.len() - start - fields;
        buf[start..].rotate_right(added);
    }

    /// Finish the record.
    fn complete(&self, buf: &mut Vec<u8>);
}
