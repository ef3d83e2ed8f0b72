//! Newline-delimited wire codec
//!
//! One request is one line terminated by `\n`; one response is everything up
//! to and including the next `\n`, returned without surrounding whitespace.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::common::{Error, Result};

/// Write a command followed by a newline and flush it
pub async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, command: &str) -> Result<()> {
    let mut line = Vec::with_capacity(command.len() + 1);
    line.extend_from_slice(command.as_bytes());
    line.push(b'\n');

    writer.write_all(&line).await.map_err(Error::Write)?;
    writer.flush().await.map_err(Error::Write)?;
    Ok(())
}

/// Read one response line of at most `max_bytes` bytes (newline included)
///
/// End of stream before the newline is an error: a response was expected.
pub async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R, max_bytes: usize) -> Result<String> {
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(max_bytes as u64)
        .read_until(b'\n', &mut buf)
        .await
        .map_err(Error::Read)?;

    if buf.last() != Some(&b'\n') {
        // A full buffer is only oversized if the peer has more to send
        if read < max_bytes || reader.fill_buf().await.map_err(Error::Read)?.is_empty() {
            return Err(Error::ConnectionClosed);
        }
        return Err(Error::ResponseTooLarge(max_bytes));
    }

    // Invalid UTF-8 is replaced, not rejected
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_write_line() {
        let mut output = Vec::new();
        write_line(&mut output, "list_pins").await.unwrap();
        assert_eq!(output, b"list_pins\n");
    }

    #[tokio::test]
    async fn test_read_line_trims() {
        let mut reader = BufReader::new(Cursor::new(b"  OK \r\n".to_vec()));
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "OK");
    }

    #[tokio::test]
    async fn test_read_line_stops_at_first_newline() {
        let mut reader = BufReader::new(Cursor::new(b"first\nsecond\n".to_vec()));
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "first");
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_read_line_eof() {
        let mut reader = BufReader::new(Cursor::new(Vec::new()));
        let err = read_line(&mut reader, 1024).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_read_line_partial_then_eof() {
        let mut reader = BufReader::new(Cursor::new(b"partial".to_vec()));
        let err = read_line(&mut reader, 1024).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_read_line_limit() {
        // Exactly at the limit, newline included
        let mut reader = BufReader::new(Cursor::new(b"abc\n".to_vec()));
        assert_eq!(read_line(&mut reader, 4).await.unwrap(), "abc");

        let mut reader = BufReader::new(Cursor::new(b"abcd\n".to_vec()));
        let err = read_line(&mut reader, 4).await.unwrap_err();
        assert!(matches!(err, Error::ResponseTooLarge(4)));
    }

    #[tokio::test]
    async fn test_read_line_limit_reached_at_eof() {
        let mut reader = BufReader::new(Cursor::new(b"abcd".to_vec()));
        let err = read_line(&mut reader, 4).await.unwrap_err();
        assert!(matches!(err, Error::ConnectionClosed), "unexpected error: {err}");

        let mut reader = BufReader::new(Cursor::new(b"abcde".to_vec()));
        let err = read_line(&mut reader, 4).await.unwrap_err();
        assert!(matches!(err, Error::ResponseTooLarge(4)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_read_line_invalid_utf8_is_replaced() {
        let mut reader = BufReader::new(Cursor::new(b"O\xffK\n".to_vec()));
        assert_eq!(read_line(&mut reader, 1024).await.unwrap(), "O\u{fffd}K");
    }
}
