//! Streaming decoding of statement bytes into UTF-8.

use crate::error::{ConvertError, Result};
use encoding_rs::{Decoder, Encoding};
use log::warn;
use std::io::{self, Read};

const CHUNK: usize = 8 * 1024;

/// Looks up an encoding by its WHATWG label, e.g. `cp1250` or `latin2`.
pub fn for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConvertError::UnknownEncoding(label.to_string()))
}

/// Wraps a byte reader and yields its content decoded to UTF-8.
///
/// A byte order mark overrides the declared encoding. Malformed sequences
/// become U+FFFD and are reported once at warn level.
pub struct DecodingReader<R> {
    inner: R,
    decoder: Decoder,
    raw: Vec<u8>,
    decoded: String,
    pos: usize,
    eof: bool,
    warned: bool,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        DecodingReader {
            inner,
            decoder: encoding.new_decoder(),
            raw: vec![0; CHUNK],
            decoded: String::new(),
            pos: 0,
            eof: false,
            warned: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let n = self.inner.read(&mut self.raw)?;
        let last = n == 0;
        self.eof = last;

        let needed = self
            .decoder
            .max_utf8_buffer_length(n)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "input chunk too large"))?;
        self.decoded.clear();
        self.pos = 0;
        self.decoded.reserve(needed);

        let (_, _, replaced) = self
            .decoder
            .decode_to_string(&self.raw[..n], &mut self.decoded, last);
        if replaced && !self.warned {
            warn!(
                "Input is not valid {}, malformed bytes were replaced",
                self.decoder.encoding().name()
            );
            self.warned = true;
        }
        Ok(())
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pos == self.decoded.len() {
            if self.eof {
                return Ok(0);
            }
            self.fill()?;
        }

        let available = &self.decoded.as_bytes()[self.pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}
