use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::ConnectionError;
use crate::gemini::request::Request;

/// Largest request line the server reads, in bytes.
pub const MAX_REQUEST_BYTES: usize = 1024;

/// Reads a request line from the client.
///
/// Stops at the first line feed, after `limit` bytes, or when the peer stops
/// sending. Anything after the first line is ignored.
pub async fn read_request<S>(stream: &mut S, limit: usize) -> Result<Request, ConnectionError>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::with_capacity(limit);
    let mut temp = [0u8; 256];

    while buffer.len() < limit && find_line_end(&buffer).is_none() {
        let want = temp.len().min(limit - buffer.len());
        let n = stream
            .read(&mut temp[..want])
            .await
            .map_err(ConnectionError::Read)?;

        if n == 0 {
            // Client closed its side
            break;
        }

        buffer.extend_from_slice(&temp[..n]);
    }

    parse_request(&buffer)
}

/// Decodes a buffered request line.
pub fn parse_request(buf: &[u8]) -> Result<Request, ConnectionError> {
    let line = match find_line_end(buf) {
        Some(end) => &buf[..end],
        None => buf,
    };
    let text = std::str::from_utf8(line)?;
    Ok(Request::new(text))
}

fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}
