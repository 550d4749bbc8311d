use tokio::io::AsyncRead;
// Import mjpeg-parser types.
use mjpeg_parser::FrameStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate an `AsyncRead` and the `Content-Type` from somewhere e.g. a camera's HTTP response.
    let (reader, content_type) = get_async_reader_from_somewhere().await;

    // Extract the boundary from the response's `Content-Type` header.
    let boundary = mjpeg_parser::parse_boundary(content_type)?;

    // Create a `FrameStream` instance from that async reader and the boundary.
    let mut frames = FrameStream::with_reader(reader, boundary);

    // Iterate over the frames, use `next_frame()` to get the next frame.
    while let Some(frame) = frames.next_frame().await? {
        // Get the part's declared length, if any.
        let length = frame.headers().get_str("content-length");

        println!(
            "Frame #{}: {} bytes of {}, Content-Length: {:?}",
            frame.index(),
            frame.len(),
            frame.content_type(),
            length
        );
    }

    Ok(())
}

// Generate an `AsyncRead` and the `Content-Type` from somewhere e.g. a camera's HTTP response.
async fn get_async_reader_from_somewhere() -> (impl AsyncRead + Unpin + Send, &'static str) {
    let data: &'static [u8] = b"--myboundary\r\nContent-Type: image/jpeg\r\nContent-Length: 6\r\n\r\n\xFF\xD8\x00\x01\xFF\xD9\r\n--myboundary\r\nContent-Type: image/jpeg\r\n\r\n\xFF\xD8\x02\xFF\xD9\r\n--myboundary--\r\n";

    (data, "multipart/x-mixed-replace; boundary=myboundary")
}
