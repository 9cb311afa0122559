//! Line-oriented transports. A session only ever sees whole, trimmed lines.

/// One bidirectional line stream per connection.
///
/// `recv_line` must be cancel safe: a worker races it against its signal
/// mailbox, and a dropped call may not lose buffered input.
#[async_trait::async_trait]
pub trait Transport: Send {
    /// Write `line` followed by a newline.
    async fn send_line(&mut self, line: &str) -> anyhow::Result<()>;
    /// Next trimmed line, or `None` once the peer has closed the stream.
    async fn recv_line(&mut self) -> anyhow::Result<Option<String>>;
}

pub mod in_memory;
pub mod tcp;
