//! Resource openers
//!
//! This module defines how the crawler gets a byte stream for a resource:
//! - The `ResourceOpener` trait the crawler is generic over
//! - `NetResourceOpener`, which dials the server over TCP and sends the
//!   selector
//! - `DeadlineStream`, which bounds the lifetime of an open connection

use crate::config::CrawlerConfig;
use crate::gopher::Resource;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant, Sleep};

/// Opens resources for reading
///
/// The returned stream is released by dropping it.
pub trait ResourceOpener: Send + Sync + 'static {
    type Stream: AsyncRead + Unpin + Send;

    fn open(&self, resource: &Resource) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Opens resources by connecting to their gopher server
///
/// Establishing a connection times out after `connect_timeout`. An
/// established connection, including the request write, times out after
/// `deadline`.
#[derive(Debug, Clone)]
pub struct NetResourceOpener {
    connect_timeout: Duration,
    deadline: Duration,
}

impl NetResourceOpener {
    pub fn new(connect_timeout: Duration, deadline: Duration) -> Self {
        Self {
            connect_timeout,
            deadline,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.connect_timeout(), config.read_deadline())
    }
}

impl Default for NetResourceOpener {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), Duration::from_secs(60))
    }
}

impl ResourceOpener for NetResourceOpener {
    type Stream = DeadlineStream<TcpStream>;

    async fn open(&self, resource: &Resource) -> io::Result<Self::Stream> {
        let address = resource.host.dial_address();

        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&address))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connecting to {} timed out", address),
                )
            })??;

        let deadline = Instant::now() + self.deadline;
        let request = format!("{}\r\n", resource.selector);

        // dropping the stream on any error below closes the connection
        timeout_at(deadline, stream.write_all(request.as_bytes()))
            .await
            .map_err(|_| deadline_exceeded())??;

        Ok(DeadlineStream::new(stream, deadline))
    }
}

/// A stream that fails every read once its deadline has passed
#[derive(Debug)]
pub struct DeadlineStream<S> {
    inner: S,
    deadline: Pin<Box<Sleep>>,
}

impl<S> DeadlineStream<S> {
    pub fn new(inner: S, deadline: Instant) -> Self {
        Self {
            inner,
            deadline: Box::pin(tokio::time::sleep_until(deadline)),
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for DeadlineStream<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.deadline.as_mut().poll(cx).is_ready() {
            return Poll::Ready(Err(deadline_exceeded()));
        }

        Pin::new(&mut this.inner).poll_read(cx, buf)
    }
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "connection deadline exceeded")
}
