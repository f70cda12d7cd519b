//! Wrapping a JSON body as `callback(payload)`.
//!
//! # Responsibilities
//! - Drain the body exactly once, in order
//! - Escape U+2028 and U+2029, which JSON allows inside strings but
//!   JavaScript treats as line terminators
//! - Emit a single chunk holding the call expression
//!
//! # Design Decisions
//! - Escaping works on raw UTF-8 bytes, so a separator split across two
//!   fragments is still caught and invalid UTF-8 passes through untouched
//! - No JSON parsing: separators cannot appear outside strings in valid JSON

use axum::body::{Body, HttpBody};
use axum::BoxError;
use bytes::{BufMut, Bytes, BytesMut};
use futures_util::StreamExt;

use crate::jsonp::error::JsonpError;

const LINE_SEPARATOR: [u8; 3] = [0xE2, 0x80, 0xA8];
const PARAGRAPH_SEPARATOR: [u8; 3] = [0xE2, 0x80, 0xA9];
const SEPARATOR_PREFIX: [u8; 2] = [0xE2, 0x80];

/// Incremental U+2028/U+2029 escaper over a sequence of byte fragments.
#[derive(Debug, Default)]
pub struct SeparatorEscaper {
    /// Trailing bytes of the previous fragment that may start a separator.
    pending: Vec<u8>,
}

impl SeparatorEscaper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escapes `fragment` into `out`, holding back an incomplete separator prefix.
    pub fn push(&mut self, fragment: &[u8], out: &mut BytesMut) {
        let joined;
        let input: &[u8] = if self.pending.is_empty() {
            fragment
        } else {
            let mut buf = std::mem::take(&mut self.pending);
            buf.extend_from_slice(fragment);
            joined = buf;
            &joined
        };

        let mut flushed = 0;
        let mut i = 0;
        while i < input.len() {
            if input[i] != SEPARATOR_PREFIX[0] {
                i += 1;
                continue;
            }

            let rest = &input[i..];
            if rest.len() < LINE_SEPARATOR.len() {
                if SEPARATOR_PREFIX.starts_with(rest) {
                    out.put_slice(&input[flushed..i]);
                    self.pending.extend_from_slice(rest);
                    return;
                }
                i += 1;
                continue;
            }

            let escape: &[u8] = match &rest[..3] {
                s if s == LINE_SEPARATOR => b"\\u2028",
                s if s == PARAGRAPH_SEPARATOR => b"\\u2029",
                _ => {
                    i += 1;
                    continue;
                }
            };
            out.put_slice(&input[flushed..i]);
            out.put_slice(escape);
            i += LINE_SEPARATOR.len();
            flushed = i;
        }
        out.put_slice(&input[flushed..]);
    }

    /// Flushes any held-back bytes; they were not a separator after all.
    pub fn finish(self, out: &mut BytesMut) {
        out.put_slice(&self.pending);
    }
}

/// Pads an in-memory sequence of fragments.
pub fn pad<I>(callback: &str, fragments: I) -> Bytes
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut out = open_call(callback);
    let mut escaper = SeparatorEscaper::new();
    for fragment in fragments {
        escaper.push(fragment.as_ref(), &mut out);
    }
    close_call(escaper, out)
}

/// Drains a response body and pads it.
pub async fn pad_body<B>(callback: &str, body: B) -> Result<Bytes, JsonpError>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let mut out = open_call(callback);
    let mut escaper = SeparatorEscaper::new();
    let mut stream = Body::new(body).into_data_stream();
    while let Some(chunk) = stream.next().await {
        escaper.push(&chunk?, &mut out);
    }
    Ok(close_call(escaper, out))
}

fn open_call(callback: &str) -> BytesMut {
    let mut out = BytesMut::with_capacity(callback.len() + 2);
    out.put_slice(callback.as_bytes());
    out.put_u8(b'(');
    out
}

fn close_call(escaper: SeparatorEscaper, mut out: BytesMut) -> Bytes {
    escaper.finish(&mut out);
    out.put_u8(b')');
    out.freeze()
}
