use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::ConnectionError;
use crate::gemini::response::Response;

/// Status line followed by the body, if any.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let header = resp.header();
    let body_len = resp.body().map_or(0, |b| b.len());

    let mut buf = Vec::with_capacity(header.len() + body_len);
    buf.extend_from_slice(header.as_bytes());

    if let Some(body) = resp.body() {
        buf.extend_from_slice(body);
    }

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Size of the serialized response, status line included.
    pub fn total_bytes(&self) -> usize {
        self.buffer.len()
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> Result<(), ConnectionError>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await
                .map_err(ConnectionError::Write)?;

            if n == 0 {
                return Err(ConnectionError::Write(std::io::Error::new(
                    std::io::ErrorKind::WriteZero,
                    "connection closed while writing",
                )));
            }

            self.written += n;
        }

        stream.flush().await.map_err(ConnectionError::Write)
    }
}
