//! Line I/O loop: bridges a byte stream to the [`RpcEngine`].
//!
//! ```text
//!  reader ──(line)──▶ RpcEngine::handle_line ──(reply)──▶ writer
//! ```
//!
//! Runs until the reader reaches EOF.  Each reply is flushed as soon as it
//! is written so an interactive client sees it immediately.  At most
//! [`MAX_REQUEST_SIZE`] bytes of a line are buffered; the rest of an
//! oversized line is skipped and answered with an error.

use std::io::{self, BufRead, Read, Write};

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{EventSink, LinePort};

use super::codec::{self, BADLY_FORMED, MAX_REQUEST_SIZE, Response};
use super::engine::RpcEngine;

enum Frame {
    Line,
    Oversized,
    Eof,
}

/// Serve requests from `reader`, writing one reply line per request to `writer`.
pub fn serve<P: LinePort, S: EventSink, D: DelayNs + Clone>(
    engine: &RpcEngine<P, S, D>,
    mut reader: impl BufRead,
    mut writer: impl Write,
) -> io::Result<()> {
    let mut served = 0usize;
    let mut buf = Vec::with_capacity(MAX_REQUEST_SIZE + 1);
    loop {
        let reply = match next_frame(&mut reader, &mut buf)? {
            Frame::Eof => break,
            Frame::Oversized => {
                warn!("API: request longer than {} bytes, skipped", MAX_REQUEST_SIZE);
                Some(codec::encode_response(&Response::error(BADLY_FORMED)))
            }
            Frame::Line => match std::str::from_utf8(&buf) {
                Ok(line) => engine.handle_line(line),
                Err(_) => {
                    warn!("API: request is not UTF-8, skipped");
                    None
                }
            },
        };

        if let Some(reply) = reply {
            writeln!(writer, "{}", reply)?;
            writer.flush()?;
            served += 1;
        }
    }
    info!("API: input closed after {} requests", served);
    Ok(())
}

/// Read the next line into `buf`, without its terminator.
fn next_frame(reader: &mut impl BufRead, buf: &mut Vec<u8>) -> io::Result<Frame> {
    buf.clear();
    let limit = MAX_REQUEST_SIZE as u64 + 1;
    if reader.by_ref().take(limit).read_until(b'\n', buf)? == 0 {
        return Ok(Frame::Eof);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(Frame::Line);
    }
    if buf.len() <= MAX_REQUEST_SIZE {
        // Last line, no terminator.
        return Ok(Frame::Line);
    }

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        if let Some(end) = chunk.iter().position(|&b| b == b'\n') {
            reader.consume(end + 1);
            break;
        }
        let len = chunk.len();
        reader.consume(len);
    }
    Ok(Frame::Oversized)
}
