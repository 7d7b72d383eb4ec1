//! Decode command handler

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use turtle::config::CodecConfig;
use turtle::style::AnsiStyleInterpreter;
use turtle::telnet::{Probe, StreamCodec};
use turtle::Config;

/// Decode `file` and print one line per token.
pub fn handle(file: &Path, chunk: Option<u64>, config: &Config) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {:?}", file))?;
    let chunk = match chunk {
        Some(chunk) => usize::try_from(chunk).unwrap_or(usize::MAX),
        None => bytes.len().max(1),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    decode_stream(ChunkedReader::new(&bytes, chunk), &config.codec, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Run `source` through the codec and style engine, writing a listing.
///
/// Runs are numbered within the text token they came from.
pub fn decode_stream<R, W>(source: R, config: &CodecConfig, out: &mut W) -> Result<()>
where
    R: Read,
    W: Write,
{
    let mut codec = StreamCodec::with_config(source, config);
    let mut interpreter = AnsiStyleInterpreter::new();

    loop {
        match codec.probe()? {
            Probe::NotReady => {}
            Probe::Text => {
                let Some(text) = codec.take_text() else {
                    continue;
                };
                for (index, run) in interpreter.parse(&text).runs().enumerate() {
                    writeln!(out, "text {} {} {:?}", index, run.style, run.text)?;
                }
            }
            Probe::Control => {
                if let Some(code) = codec.take_control() {
                    writeln!(out, "telnet {}", code)?;
                }
            }
            Probe::EndOfStream => break,
        }
    }

    Ok(())
}

/// Reader over a byte slice that returns at most `chunk` bytes per read.
pub struct ChunkedReader<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> ChunkedReader<'a> {
    pub fn new(data: &'a [u8], chunk: usize) -> Self {
        Self {
            data,
            chunk: chunk.max(1),
        }
    }
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.chunk).min(self.data.len());
        let (head, rest) = self.data.split_at(len);
        buf[..len].copy_from_slice(head);
        self.data = rest;
        Ok(len)
    }
}
