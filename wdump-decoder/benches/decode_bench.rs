//! Decoder throughput benchmarks

use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};
use wdump_decoder::{
    read_module,
    InstructionDecoder,
    Module,
    NoOpVisitor,
    ReaderConfig,
};
use wdump_format::BinaryReader;

/// A module with enough code to make the instruction loop dominate
fn build_module() -> Vec<u8> {
    let mut body = String::new();
    for i in 0..200 {
        body.push_str(&format!(
            "(block (result i32) local.get 0 i32.const {i} i32.add br_if 0 drop i32.const {i}) drop\n"
        ));
    }
    let text = format!(
        "(module (memory 1) (func (param i32) {body}) (func (param i32) (result i32) local.get 0 \
         i32.load offset=8 i32.const 3 i32.mul))"
    );
    wat::parse_str(text).unwrap()
}

fn benchmark_module_reader(c: &mut Criterion) {
    let bytes = build_module();
    let mut group = c.benchmark_group("module_reader");

    group.bench_function("validate_only", |b| {
        b.iter(|| read_module(black_box(&bytes), &mut NoOpVisitor).unwrap());
    });

    group.bench_function("collect", |b| {
        b.iter(|| {
            let module = Module::from_bytes(black_box(&bytes), ReaderConfig::default()).unwrap();
            black_box(module)
        });
    });

    group.finish();
}

fn benchmark_instruction_stream(c: &mut Criterion) {
    // nop, i32.const -5, i32.add, repeated
    let code: Vec<u8> = [0x01, 0x41, 0x7B, 0x6A].repeat(4096);

    c.bench_function("instruction_stream", |b| {
        b.iter(|| {
            let mut reader = BinaryReader::new(black_box(&code));
            let mut count = 0usize;
            InstructionDecoder::decode(&mut reader, code.len(), |_| {
                count += 1;
                Ok(())
            })
            .unwrap();
            black_box(count)
        });
    });
}

criterion_group!(benches, benchmark_module_reader, benchmark_instruction_stream);
criterion_main!(benches);
