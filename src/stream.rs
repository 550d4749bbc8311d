use crate::constraints::Constraints;
use crate::extractor::{Event, FrameExtractor};
use crate::frame::Frame;
use bytes::Bytes;
use futures_util::future;
use futures_util::stream::{Stream, TryStreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
#[cfg(feature = "tokio-io")]
use {tokio::io::AsyncRead, tokio_util::io::ReaderStream};

/// Yields the JPEG frames of a motion-JPEG body delivered as a stream of
/// byte chunks.
///
/// Frames are produced in stream order. Once the terminating boundary has
/// been seen, or after the first error, the stream yields `None`.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use futures_util::stream::once;
/// use mjpeg_parser::FrameStream;
/// use std::convert::Infallible;
///
/// # async fn run() {
/// let data = "--myboundary\r\nContent-Length: 4\r\n\r\nabcd\r\n--myboundary--\r\n";
/// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
/// let mut frames = FrameStream::new(stream, "myboundary");
///
/// while let Some(frame) = frames.next_frame().await.unwrap() {
///     println!("Frame: {:?}", frame.data());
/// }
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run());
/// ```
pub struct FrameStream<'r> {
    stream: Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send + 'r>>,
    extractor: FrameExtractor,
    frames: VecDeque<Frame>,
    error: Option<crate::Error>,
    done: bool,
}

impl<'r> FrameStream<'r> {
    /// Construct a new `FrameStream` instance with the given [`Bytes`] stream
    /// and the boundary.
    pub fn new<S, O, E, B>(stream: S, boundary: B) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
        B: AsRef<str>,
    {
        FrameStream::with_constraints(stream, boundary, Constraints::default())
    }

    /// Construct a new `FrameStream` instance with the given [`Bytes`] stream,
    /// the boundary and the constraints.
    pub fn with_constraints<S, O, E, B>(stream: S, boundary: B, constraints: Constraints) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
        B: AsRef<str>,
    {
        let stream = stream
            .map_ok(Into::<Bytes>::into)
            .map_err(|err| crate::Error::StreamReadFailed(err.into()));

        FrameStream {
            stream: Box::pin(stream),
            extractor: FrameExtractor::with_constraints(boundary, constraints),
            frames: VecDeque::new(),
            error: None,
            done: false,
        }
    }

    /// Construct a new `FrameStream` instance with the given
    /// [`AsyncRead`](tokio::io::AsyncRead) reader and the boundary.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader<R, B>(reader: R, boundary: B) -> Self
    where
        R: AsyncRead + Unpin + Send + 'r,
        B: AsRef<str>,
    {
        FrameStream::new(ReaderStream::new(reader), boundary)
    }

    /// Construct a new `FrameStream` instance with the given
    /// [`AsyncRead`](tokio::io::AsyncRead) reader, the boundary and the
    /// constraints.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader_with_constraints<R, B>(reader: R, boundary: B, constraints: Constraints) -> Self
    where
        R: AsyncRead + Unpin + Send + 'r,
        B: AsRef<str>,
    {
        FrameStream::with_constraints(ReaderStream::new(reader), boundary, constraints)
    }

    /// Yields the next [`Frame`] if available.
    pub async fn next_frame(&mut self) -> crate::Result<Option<Frame>> {
        future::poll_fn(|cx| self.poll_next_frame(cx)).await
    }

    /// Polls for the next [`Frame`].
    pub fn poll_next_frame(&mut self, cx: &mut Context<'_>) -> Poll<crate::Result<Option<Frame>>> {
        loop {
            if let Some(frame) = self.frames.pop_front() {
                return Poll::Ready(Ok(Some(frame)));
            }

            if let Some(err) = self.error.take() {
                return Poll::Ready(Err(err));
            }

            if self.done {
                return Poll::Ready(Ok(None));
            }

            match self.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => self.feed(&chunk),
                Poll::Ready(Some(Err(err))) => self.fail(err),
                Poll::Ready(None) => {
                    self.done = true;

                    if let Err(err) = self.extractor.finish() {
                        self.fail(err);
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }

    fn feed(&mut self, chunk: &[u8]) {
        let FrameStream {
            extractor,
            frames,
            done,
            ..
        } = self;

        let res = extractor.push(chunk, |event| match event {
            Event::Frame(frame) => frames.push_back(frame),
            Event::PartComplete => {}
            Event::StreamEnd => *done = true,
        });

        if let Err(err) = res {
            self.fail(err);
        }
    }

    fn fail(&mut self, err: crate::Error) {
        debug!("frame stream failed: {}", err);
        self.done = true;
        self.error = Some(err);
    }
}

impl Stream for FrameStream<'_> {
    type Item = crate::Result<Frame>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_next_frame(cx).map(Result::transpose)
    }
}
