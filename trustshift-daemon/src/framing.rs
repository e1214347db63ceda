//! Length-delimited framing.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Errors raised while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame too large: {len} bytes (max {max})")]
    TooLarge { len: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Check if the peer closed the connection between frames.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

/// Read a length-delimited frame from an async reader.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    max_frame_size: usize,
) -> Result<Bytes, FrameError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > max_frame_size {
        return Err(FrameError::TooLarge {
            len,
            max: max_frame_size,
        });
    }

    let mut buf = BytesMut::zeroed(len);
    reader.read_exact(&mut buf).await?;

    Ok(buf.freeze())
}

/// Write a length-delimited frame to an async writer.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    data: &[u8],
    max_frame_size: usize,
) -> Result<(), FrameError> {
    if data.len() > max_frame_size {
        return Err(FrameError::TooLarge {
            len: data.len(),
            max: max_frame_size,
        });
    }

    let len = u32::try_from(data.len()).map_err(|_| FrameError::TooLarge {
        len: data.len(),
        max: max_frame_size,
    })?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;

    Ok(())
}
