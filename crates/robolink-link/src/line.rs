//! Newline-delimited tokens over a byte stream.

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::sync::Mutex;

use crate::{next_link_id, Link, LinkError, LinkId};

/// A [`Link`] that frames each token as one line.
///
/// Outgoing tokens are written followed by `\n`. Incoming lines are
/// stripped of `\n` or `\r\n` and returned as raw bytes, valid UTF-8 or
/// not. Tokens themselves must not contain a newline.
pub struct LineLink<R, W> {
    id: LinkId,
    reader: Mutex<BufReader<R>>,
    writer: Mutex<Option<W>>,
}

impl<R, W> LineLink<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Builds a link from separate read and write halves.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            id: next_link_id(),
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(Some(writer)),
        }
    }
}

impl<S> LineLink<ReadHalf<S>, WriteHalf<S>>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Builds a link over a single bidirectional stream.
    pub fn from_stream(stream: S) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self::new(reader, writer)
    }
}

impl<R, W> Link for LineLink<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&self, token: &[u8]) -> Result<(), LinkError> {
        if token.contains(&b'\n') {
            return Err(LinkError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "token contains a newline",
            )));
        }

        let mut writer = self.writer.lock().await;
        let writer = writer
            .as_mut()
            .ok_or_else(|| LinkError::Closed(format!("{} was closed", self.id)))?;
        writer.write_all(token).await.map_err(LinkError::SendFailed)?;
        writer.write_all(b"\n").await.map_err(LinkError::SendFailed)?;
        writer.flush().await.map_err(LinkError::SendFailed)
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, LinkError> {
        let mut line = Vec::new();
        let read = self
            .reader
            .lock()
            .await
            .read_until(b'\n', &mut line)
            .await
            .map_err(LinkError::ReceiveFailed)?;
        if read == 0 {
            return Ok(None);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    async fn close(&self) -> Result<(), LinkError> {
        if let Some(mut writer) = self.writer.lock().await.take() {
            writer.shutdown().await.map_err(LinkError::SendFailed)?;
            tracing::debug!(id = %self.id, "line link closed");
        }
        Ok(())
    }

    fn id(&self) -> LinkId {
        self.id
    }
}
