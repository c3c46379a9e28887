// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::encode;
use crate::{Context, Pattern, Placement, RuntimeCompute};

/// Writes each record as one line of tab-separated `key:value` fields.
///
/// Runtime values with `Placement::Leading`, such as the timestamp, are
/// written unlabeled at the start of the line:
///
/// ```text
/// 2021-01-01T00:00:00.000+00:00	level:INFO	B:true	INT:10	msg:abcdefg
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct LinePattern;

impl Pattern for LinePattern {
    fn init(&self, _buf: &mut Vec<u8>) {}

    fn append_key(&self, buf: &mut Vec<u8>, key: &str) {
        buf.push(b'\t');
        encode::escape(buf, key.as_bytes());
        buf.push(b':');
    }

    fn append_str(&self, buf: &mut Vec<u8>, value: &str) {
        encode::escape(buf, value.as_bytes());
    }

    fn append_bytes(&self, buf: &mut Vec<u8>, value: &[u8]) {
        encode::escape(buf, value);
    }

    fn append_i64(&self, buf: &mut Vec<u8>, value: i64, radix: u32) {
        encode::signed(buf, value, radix);
    }

    fn append_u64(&self, buf: &mut Vec<u8>, value: u64, radix: u32) {
        encode::unsigned(buf, value, radix);
    }

    fn append_f64(&self, buf: &mut Vec<u8>, value: f64) {
        encode::float(buf, value);
    }

    fn append_f32(&self, buf: &mut Vec<u8>, value: f32) {
        encode::float(buf, value);
    }

    fn append_raw(&self, buf: &mut Vec<u8>, value: &[u8]) {
        buf.extend_from_slice(value);
    }

    fn append_runtime(
        &self,
        buf: &mut Vec<u8>,
        fields: usize,
        compute: &dyn RuntimeCompute,
        context: &Context<'_>,
    ) {
        let value = compute.compute(context);
        let len = buf.len();

        match compute.placement() {
            Placement::Field => {
                self.append_key(buf, compute.name());
                self.append_computed(buf, &value);
                let added = buf.len() - len;
                buf[len - fields..].rotate_right(added);
            }
            Placement::Leading => {
                self.append_computed(buf, &value);
                let added = buf.len() - len;
                buf.rotate_right(added);
            }
        }
    }

    fn complete(&self, buf: &mut Vec<u8>) {
        buf.push(b'\n');
    }
}
