//! Streaming I/O targets for executables.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::task::Context;
use std::task::Poll;

use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

/// A shareable, streaming output target.
///
/// Cloning yields another handle to the same underlying writer, so a runner
/// and every executable it builds write to one place. Writes are flushed
/// immediately: output streams as produced, it is not buffered to
/// completion.
#[derive(Clone)]
pub struct OutputSink {
    inner: Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>,
}

impl OutputSink {
    pub fn new(writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// A sink over the process's stdout.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }

    /// A sink over the process's stderr.
    pub fn stderr() -> Self {
        Self::new(tokio::io::stderr())
    }

    /// Write a chunk and flush it through.
    pub async fn write_all(&self, chunk: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(chunk).await?;
        writer.flush().await
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink").finish_non_exhaustive()
    }
}

/// A shareable stdin reader handed to at most one execution.
///
/// The runner clones the handle into each executable configuration; the
/// first run that wires stdin through takes the reader, later takers see
/// `None`.
#[derive(Clone, Default)]
pub struct StdinSource {
    inner: Arc<StdMutex<Option<Box<dyn AsyncRead + Send + Unpin>>>>,
}

impl StdinSource {
    pub fn new(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self {
            inner: Arc::new(StdMutex::new(Some(Box::new(reader)))),
        }
    }

    /// The process's own stdin.
    pub fn inherited() -> Self {
        Self::new(tokio::io::stdin())
    }

    /// Take the reader out, leaving `None` behind.
    pub fn take(&self) -> Option<Box<dyn AsyncRead + Send + Unpin>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource").finish_non_exhaustive()
    }
}

/// Close-once guard for the stdin pump of an interactive run.
///
/// The pump task copying caller stdin into the child is registered here;
/// `close` aborts it, which drops the child's stdin handle and unblocks any
/// reader still waiting on input. Closing is idempotent and safe to race
/// between the exit monitor and the run itself finishing first.
#[derive(Clone, Debug, Default)]
pub struct StdinGate {
    handle: Arc<StdMutex<Option<AbortHandle>>>,
}

impl StdinGate {
    /// Register the pump task to abort on close.
    pub fn arm(&self, handle: AbortHandle) {
        *self.handle.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
    }

    /// Abort the pump if it is still running. Returns true on first close.
    pub fn close(&self) -> bool {
        match self
            .handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

/// An in-memory sink that accumulates everything written to it.
///
/// Useful wherever output has to be captured instead of streamed to a
/// terminal: tests, dry-run buffers, remote transports.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    inner: Arc<StdMutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An output sink writing into this buffer.
    pub fn sink(&self) -> OutputSink {
        OutputSink::new(self.clone())
    }

    pub fn contents(&self) -> Vec<u8> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[cfg(test)]
#[path = "io.test.rs"]
mod tests;
