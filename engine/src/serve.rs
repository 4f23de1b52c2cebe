//! Line-oriented request loop.
//!
//! One JSON request per input line, one [`Response`](crate::Response) per
//! output line, in the same order. Calls run on tokio's blocking pool with at
//! most `max_in_flight` outstanding at a time.
//!
//! Lines are read as bytes, at most `max_request_bytes + 1` of them at a time.
//! An oversized or non-UTF-8 line gets a `bad_request` reply and the loop
//! moves on; only I/O errors end it.

use std::io;
use std::pin::pin;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::request::{ErrorBody, ErrorKind, Response};
use crate::server::{RpcServer, ServerError, encode_response};

/// Default number of requests processed concurrently.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Error types for the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Failed to read request: {0}")]
    Read(#[source] io::Error),
    #[error("Failed to write response: {0}")]
    Write(#[source] io::Error),
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub requests: usize,
    pub failures: usize,
}

/// One input line, before dispatch.
enum Incoming {
    Line(String),
    Rejected(Response),
}

impl Incoming {
    fn is_blank(&self) -> bool {
        matches!(self, Incoming::Line(line) if line.trim().is_empty())
    }
}

/// Read the next line, buffering at most `limit + 1` bytes of it.
async fn read_request<R>(reader: &mut R, limit: usize) -> io::Result<Option<Incoming>>
where
    R: AsyncBufRead + Unpin,
{
    let window = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(window)
        .read_until(b'\n', &mut buf)
        .await?;
    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > limit {
        let skipped = skip_line(reader).await?;
        let err = ServerError::TooLarge {
            size: buf.len() + skipped,
            limit,
        };
        tracing::debug!("{err}");
        return Ok(Some(Incoming::Rejected(Response::bad_request(err.to_string()))));
    }

    Ok(Some(match String::from_utf8(buf) {
        Ok(line) => Incoming::Line(line),
        Err(err) => Incoming::Rejected(Response::bad_request(format!(
            "Bad request: {}",
            err.utf8_error()
        ))),
    }))
}

/// Discard input through the next newline. Returns the bytes dropped, newline
/// excluded.
async fn skip_line<R>(reader: &mut R) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;
    loop {
        let (consumed, done) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(skipped);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(index) => (index + 1, Some(index)),
                None => (available.len(), None),
            }
        };
        reader.consume(consumed);
        match done {
            Some(index) => return Ok(skipped + index),
            None => skipped += consumed,
        }
    }
}

/// Serve requests from `reader` until end of input.
pub async fn serve<R, W>(
    server: Arc<RpcServer>,
    reader: R,
    mut writer: W,
    max_in_flight: usize,
) -> Result<ServeStats, ServeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let max_in_flight = max_in_flight.max(1);
    let limit = server.limits().max_request_bytes;
    tracing::info!(
        endpoints = server.endpoint_count(),
        max_in_flight,
        "Serving requests"
    );

    let incoming = stream::unfold(Some(reader), move |reader| async move {
        let Some(mut reader) = reader else {
            return None;
        };
        match read_request(&mut reader, limit).await {
            Ok(Some(incoming)) => Some((Ok(incoming), Some(reader))),
            Ok(None) => None,
            Err(err) => Some((Err(err), None)),
        }
    });

    let responses = incoming
        .filter(|incoming| {
            let keep = !matches!(incoming, Ok(incoming) if incoming.is_blank());
            async move { keep }
        })
        .map(|incoming| {
            let server = Arc::clone(&server);
            async move {
                let line = match incoming.map_err(ServeError::Read)? {
                    Incoming::Line(line) => line,
                    Incoming::Rejected(response) => return Ok(response),
                };
                let handled = tokio::task::spawn_blocking(move || server.reply(&line)).await;
                Ok::<Response, ServeError>(handled.unwrap_or_else(|err| {
                    tracing::warn!("Request task failed: {err}");
                    Response::Error(ErrorBody::new(
                        ErrorKind::RuntimeFailure,
                        format!("request task failed: {err}"),
                    ))
                }))
            }
        })
        .buffered(max_in_flight);
    let mut responses = pin!(responses);

    let mut stats = ServeStats::default();
    while let Some(response) = responses.next().await {
        let response = response?;
        stats.requests += 1;
        if response.is_error() {
            stats.failures += 1;
        }
        let line = encode_response(&response);
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(ServeError::Write)?;
        writer.write_all(b"\n").await.map_err(ServeError::Write)?;
    }
    writer.flush().await.map_err(ServeError::Write)?;

    tracing::info!(
        requests = stats.requests,
        failures = stats.failures,
        "Serve loop finished"
    );
    Ok(stats)
}
