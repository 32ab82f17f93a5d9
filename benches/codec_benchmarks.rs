// Benchmark suite over the GSM 51.010 conformance vectors: measures
// decode and encode throughput for the common PDU shapes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use stk::{
    decode_command, decode_envelope, decode_terminal_response, encode_command,
    encode_envelope, EncodeOptions,
};

static DISPLAY_TEXT: &[u8] = &[
    0xD0, 0x1A, 0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x81, 0x02, 0x8D, 0x0F, 0x04,
    0x54, 0x6F, 0x6F, 0x6C, 0x6B, 0x69, 0x74, 0x20, 0x54, 0x65, 0x73, 0x74, 0x20, 0x31,
];

static SETUP_MENU: &[u8] = &[
    0xD0, 0x3B, 0x81, 0x03, 0x01, 0x25, 0x00, 0x82, 0x02, 0x81, 0x82, 0x85, 0x0C, 0x54,
    0x6F, 0x6F, 0x6C, 0x6B, 0x69, 0x74, 0x20, 0x4D, 0x65, 0x6E, 0x75, 0x8F, 0x07, 0x01,
    0x49, 0x74, 0x65, 0x6D, 0x20, 0x31, 0x8F, 0x07, 0x02, 0x49, 0x74, 0x65, 0x6D, 0x20,
    0x32, 0x8F, 0x07, 0x03, 0x49, 0x74, 0x65, 0x6D, 0x20, 0x33, 0x8F, 0x07, 0x04, 0x49,
    0x74, 0x65, 0x6D, 0x20, 0x34,
];

static MENU_SELECTION: &[u8] = &[0xD3, 0x07, 0x82, 0x02, 0x01, 0x81, 0x90, 0x01, 0x02];

static DISPLAY_TEXT_RESP: &[u8] = &[
    0x81, 0x03, 0x01, 0x21, 0x80, 0x82, 0x02, 0x82, 0x81, 0x83, 0x01, 0x00,
];

fn benchmark_command_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_decoding");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("display_text", |b| {
        b.iter(|| decode_command(black_box(DISPLAY_TEXT)).unwrap())
    });
    group.bench_function("setup_menu", |b| {
        b.iter(|| decode_command(black_box(SETUP_MENU)).unwrap())
    });
    group.finish();
}

fn benchmark_command_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("command_encoding");
    group.measurement_time(Duration::from_secs(5));

    let display_text = decode_command(DISPLAY_TEXT).unwrap();
    let setup_menu = decode_command(SETUP_MENU).unwrap();
    group.bench_function("display_text", |b| {
        b.iter(|| encode_command(black_box(&display_text), EncodeOptions::NONE))
    });
    group.bench_function("setup_menu", |b| {
        b.iter(|| encode_command(black_box(&setup_menu), EncodeOptions::NONE))
    });
    group.finish();
}

fn benchmark_response_and_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_and_envelope");
    group.measurement_time(Duration::from_secs(5));

    let envelope = decode_envelope(MENU_SELECTION).unwrap();
    group.bench_function("decode_terminal_response", |b| {
        b.iter(|| decode_terminal_response(black_box(DISPLAY_TEXT_RESP)).unwrap())
    });
    group.bench_function("decode_envelope", |b| {
        b.iter(|| decode_envelope(black_box(MENU_SELECTION)).unwrap())
    });
    group.bench_function("encode_envelope", |b| {
        b.iter(|| encode_envelope(black_box(&envelope)))
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_command_decoding,
    benchmark_command_encoding,
    benchmark_response_and_envelope
);
criterion_main!(benches);
