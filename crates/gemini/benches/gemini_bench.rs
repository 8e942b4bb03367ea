use bytes::{Bytes, BytesMut};
use criterion::{Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use micro_gemini::handler::make_handler;
use micro_gemini::{
    codec::{RequestDecoder, ResponseEncoder},
    connection::GeminiConnection,
    protocol::{Message, Request, StatusCode, StatusLine},
};
use std::{
    hint::black_box,
    io,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio_util::codec::{Decoder, Encoder};

// Mock IO for testing
#[derive(Clone)]
struct MockIO {
    read_data: Vec<u8>,
    write_data: Vec<u8>,
    read_pos: usize,
}

impl MockIO {
    fn new(read_data: Vec<u8>) -> Self {
        Self { read_data, write_data: Vec::new(), read_pos: 0 }
    }
}

impl AsyncRead for MockIO {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = &self.read_data[self.read_pos..];
        let amt = std::cmp::min(remaining.len(), buf.remaining());
        buf.put_slice(&remaining[..amt]);
        self.read_pos += amt;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockIO {
    fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
        self.write_data.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        Poll::Ready(Ok(()))
    }
}

fn bench_request_decoder(c: &mut Criterion) {
    let request = b"gemini://example.org/docs/index.gmi?q=rust\r\n";

    c.bench_function("decode_request_line", |b| {
        b.iter(|| {
            let mut decoder = RequestDecoder::new();
            let mut bytes = BytesMut::from(&request[..]);
            black_box(decoder.decode(&mut bytes).unwrap());
        });
    });
}

fn bench_request_parse(c: &mut Criterion) {
    c.bench_function("parse_request_url", |b| {
        b.iter(|| black_box(Request::parse(black_box("gemini://example.org/docs/index.gmi?q=rust")).unwrap()));
    });
}

fn bench_response_encoder(c: &mut Criterion) {
    c.bench_function("encode_status_and_body", |b| {
        b.iter(|| {
            let mut encoder = ResponseEncoder::new();
            let mut bytes = BytesMut::new();
            let header = Message::<Bytes>::Header(StatusLine::new(StatusCode::SUCCESS, "text/gemini"));
            encoder.encode(header, &mut bytes).unwrap();
            encoder.encode(Message::Payload(Bytes::from_static(b"# Hello World!")), &mut bytes).unwrap();
            black_box(bytes);
        });
    });
}

fn bench_gemini_connection(c: &mut Criterion) {
    let request = b"gemini://localhost/\r\n";
    let handler = Arc::new(make_handler(|response, _request| {
        Box::pin(async move {
            response.write(b"# Hello World!").await?;
            Ok(())
        })
    }));

    c.bench_function("process_simple_request", |b| {
        b.iter(|| {
            let mock_io = MockIO::new(request.to_vec());
            let (reader, writer) = (mock_io.clone(), mock_io);
            let connection = GeminiConnection::new(reader, writer);
            black_box(block_on(connection.process(Arc::clone(&handler))).unwrap());
        });
    });
}

criterion_group!(benches, bench_request_decoder, bench_request_parse, bench_response_encoder, bench_gemini_connection);
criterion_main!(benches);
