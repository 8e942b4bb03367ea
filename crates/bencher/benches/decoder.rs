use std::hint::black_box;
use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_gemini::codec::RequestDecoder;
use micro_gemini::protocol::Request;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

static SHORT_LINE: TestFile = TestFile::new("short_line.txt", include_str!("../resources/request/short_line.txt"));
static LONG_LINE: TestFile = TestFile::new("long_line.txt", include_str!("../resources/request/long_line.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::short("short_line_decoder", SHORT_LINE), TestCase::long("long_line_decoder", LONG_LINE)]
}

fn benchmark_request_decoder(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("request_decoder");

    for case in test_cases {
        group.throughput(Throughput::Bytes(case.file().content().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let mut request_decoder = RequestDecoder::new();
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let line = request_decoder.decode(bytes_mut).expect("input should be a valid request line").unwrap();
                    let request = Request::parse(&line).expect("input should be a gemini url");
                    black_box(request);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_request_decoder);
criterion_main!(decoder);
