use std::io::ErrorKind;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::config::MAX_LINE_LEN;
use crate::transport::Transport;

/// Newline-framed text over TCP.
///
/// Incoming bytes accumulate in `pending` until a newline arrives, so a
/// cancelled `recv_line` never drops a partial line.
pub struct TcpTransport {
    stream: TcpStream,
    pending: Vec<u8>,
    max_line_len: usize,
}

impl TcpTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_max_line_len(stream, MAX_LINE_LEN)
    }

    pub fn with_max_line_len(stream: TcpStream, max_line_len: usize) -> Self {
        Self {
            stream,
            pending: Vec::new(),
            max_line_len,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }

    fn take_line(&mut self, end: usize) -> String {
        let raw: Vec<u8> = self.pending.drain(..end).collect();
        String::from_utf8_lossy(&raw).trim().to_string()
    }
}

fn io_error(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
            anyhow::anyhow!("Connection closed by peer")
        }
        _ => anyhow::anyhow!("I/O error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.stream.write_all(&data).await.map_err(io_error)?;
        Ok(())
    }

    async fn recv_line(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            let newline = self.pending.iter().position(|b| *b == b'\n');
            let line_len = newline.unwrap_or(self.pending.len());
            if line_len > self.max_line_len {
                return Err(anyhow::anyhow!(
                    "Line too long: more than {} bytes",
                    self.max_line_len
                ));
            }
            if let Some(pos) = newline {
                return Ok(Some(self.take_line(pos + 1)));
            }

            let mut chunk = [0u8; 512];
            let n = self.stream.read(&mut chunk).await.map_err(io_error)?;
            if n == 0 {
                // Peer closed. A final unterminated line still counts.
                if self.pending.is_empty() {
                    return Ok(None);
                }
                let end = self.pending.len();
                return Ok(Some(self.take_line(end)));
            }
            self.pending.extend_from_slice(&chunk[..n]);
        }
    }
}
