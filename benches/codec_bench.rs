//! Benchmarks for srcon codec operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use srcon::protocol::{decode, encode, Packet, PacketKind};

fn codec_benchmarks(c: &mut Criterion) {
    let small = Packet::new(1, PacketKind::EXEC_COMMAND, &b"status"[..]);
    let large = Packet::new(2, PacketKind::EXEC_COMMAND, vec![b'x'; 4086]);

    let small_frame = encode(&small).unwrap();
    let large_frame = encode(&large).unwrap();

    c.bench_function("encode_small", |b| {
        b.iter(|| encode(black_box(&small)).unwrap())
    });
    c.bench_function("encode_large", |b| {
        b.iter(|| encode(black_box(&large)).unwrap())
    });
    c.bench_function("decode_small", |b| {
        b.iter(|| decode(black_box(&small_frame)).unwrap())
    });
    c.bench_function("decode_large", |b| {
        b.iter(|| decode(black_box(&large_frame)).unwrap())
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
