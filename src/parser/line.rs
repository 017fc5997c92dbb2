//! Bounded line reading over a buffered transport.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;

/// Read one line, terminator included, reading at most `limit` bytes.
///
/// Returns an empty buffer at end of stream.
pub(crate) async fn read_line<R>(reader: &mut R, limit: usize) -> Result<Vec<u8>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut limited = (&mut *reader).take(limit as u64);
    let n = limited.read_until(b'\n', &mut line).await?;
    if n >= limit && !line.ends_with(b"\n") {
        return Err(Error::LineTooLong(limit));
    }
    Ok(line)
}

/// True for a line made only of a terminator.
pub(crate) fn is_blank(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Strip a trailing `\n` or `\r\n`.
pub(crate) fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
