use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use mjpeg_parser::{Constraints, Event, FrameExtractor, FrameStream};

const JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD8, 0x01, 0xFF, 0xD9, 0xFF, 0xDA, 0x12,
    0xFF, 0x00, 0x34, 0xFF, 0xD9,
];

fn part(headers: &str, body: &[u8]) -> Vec<u8> {
    let mut data = format!("--myboundary\r\n{}\r\n", headers).into_bytes();
    data.extend_from_slice(body);
    data.extend_from_slice(b"\r\n");
    data
}

fn camera_stream(n: usize) -> Vec<u8> {
    let mut data = Vec::new();

    for idx in 0..n {
        let headers = match idx % 3 {
            0 => format!("Content-Type: image/jpeg\r\nContent-Length: {}\r\n", JPEG.len()),
            1 => format!("Content-Type: image/jpeg\r\nDataLen: {:07}\r\n", JPEG.len()),
            _ => "Content-Type: image/jpeg\r\n".to_owned(),
        };
        data.extend(part(&headers, JPEG));
    }

    data.extend_from_slice(b"--myboundary--\r\n");
    data
}

fn byte_stream(data: Vec<u8>) -> impl futures_util::Stream<Item = mjpeg_parser::Result<Bytes>> {
    stream::iter(
        data.into_iter()
            .map(|byte| mjpeg_parser::Result::Ok(Bytes::copy_from_slice(&[byte]))),
    )
}

#[tokio::test]
async fn test_frames_from_single_byte_chunks() {
    let mut frames = FrameStream::new(byte_stream(camera_stream(9)), "myboundary");

    let mut count = 0;
    while let Some(frame) = frames.next_frame().await.unwrap() {
        assert_eq!(frame.index(), count);
        assert_eq!(&frame.data()[..], JPEG);
        assert_eq!(frame.content_type(), &mime::IMAGE_JPEG);
        count += 1;
    }

    assert_eq!(count, 9);
    assert!(frames.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_frame_stream_as_stream() {
    let frames = FrameStream::new(byte_stream(camera_stream(4)), "--myboundary");

    let lens: Vec<usize> = frames.map(|frame| frame.unwrap().len()).collect().await;

    assert_eq!(lens, vec![JPEG.len(); 4]);
}

#[tokio::test]
async fn test_frame_stream_empty() {
    let mut frames = FrameStream::new(byte_stream(b"--myboundary--\r\n".to_vec()), "myboundary");

    assert!(frames.next_frame().await.unwrap().is_none());
    assert!(frames.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_frame_stream_truncated() {
    let mut data = part("Content-Length: 10\r\n", b"0123456789");
    data.extend_from_slice(b"--myboundary\r\nContent-Length: 10\r\n\r\n01234");

    let mut frames = FrameStream::new(byte_stream(data), "myboundary");

    assert_eq!(frames.next_frame().await.unwrap().map(|f| f.len()), Some(10));
    assert_eq!(
        frames.next_frame().await,
        Err(mjpeg_parser::Error::IncompleteFrame {
            expected: Some(10),
            received: 5
        })
    );
    assert!(frames.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_frame_stream_yields_frames_before_error() {
    let mut data = part("Content-Length: 3\r\n", b"abc");
    data.extend(part("Content-Type: image/gif\r\nContent-Length: 3\r\n", b"def"));

    let stream = stream::once(async move { mjpeg_parser::Result::<Bytes>::Ok(Bytes::from(data)) });
    let mut frames = FrameStream::new(stream, "myboundary");

    assert_eq!(frames.next_frame().await.unwrap().map(|f| f.into_bytes()), Some(Bytes::from_static(b"abc")));
    assert!(frames.next_frame().await.is_err());
    assert!(frames.next_frame().await.unwrap().is_none());
}

#[tokio::test]
async fn test_frame_stream_read_error() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"--myboundary\r\n")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ];

    let mut frames = FrameStream::new(stream::iter(chunks), "myboundary");

    let err = frames.next_frame().await.unwrap_err();
    assert_eq!(err.to_string(), "stream read failed: reset");
}

#[test]
fn test_chunk_boundary_invariance() {
    let data = camera_stream(6);

    let extract = |chunk_size: usize| {
        let mut extractor = FrameExtractor::new("myboundary");
        let mut frames = Vec::new();
        let mut ends = 0;

        for chunk in data.chunks(chunk_size) {
            extractor
                .push(chunk, |event| match event {
                    Event::Frame(frame) => frames.push(frame.into_bytes()),
                    Event::StreamEnd => ends += 1,
                    Event::PartComplete => {}
                })
                .unwrap();
        }

        (frames, ends)
    };

    let (whole, ends) = extract(data.len());
    assert_eq!(whole.len(), 6);
    assert_eq!(ends, 1);

    for chunk_size in 1..64 {
        assert_eq!(extract(chunk_size), (whole.clone(), 1), "chunk size {}", chunk_size);
    }
}

#[test]
fn test_frame_size_limit() {
    let data = part(&format!("Content-Length: {}\r\n", JPEG.len()), JPEG);
    let mut extractor = FrameExtractor::with_constraints("myboundary", Constraints::new().max_frame_size(JPEG.len() - 1));

    let mut frames = 0;
    let res = extractor.push(&data, |event| {
        if let Event::Frame(_) = event {
            frames += 1;
        }
    });

    assert_eq!(
        res,
        Err(mjpeg_parser::Error::FrameTooLarge {
            size: JPEG.len(),
            limit: JPEG.len() - 1
        })
    );
    assert_eq!(frames, 0);
}
