use criterion::{black_box, criterion_group, criterion_main, Criterion};
use regir::reader::read_all;
use regir::{assemble, IrSource};

fn assemble_benchmark(c: &mut Criterion) {
    let source = "(prim 0 s32) (bind 0 0) (bind 1 0) (bind 2 0) (add 2 0 1) (return 2)";

    c.bench_function("read small function", |b| {
        b.iter(|| read_all(black_box(source)).unwrap())
    });

    let records = read_all(source).unwrap();
    c.bench_function("assemble small function", |b| {
        b.iter(|| assemble(black_box(&IrSource::new("add2", 2, records.clone()))).unwrap())
    });
}

fn emit_benchmark(c: &mut Criterion) {
    // A larger straight-line body: 64 registers, one add per register.
    let mut source = String::from("(prim 0 s32) ");
    for r in 0..64 {
        source.push_str(&format!("(bind {r} 0) "));
    }
    for r in 2..64 {
        source.push_str(&format!("(add {r} {} {}) ", r - 1, r - 2));
    }
    source.push_str("(return 63)");

    let records = read_all(&source).unwrap();
    let ir = assemble(&IrSource::new("chain", 2, records)).unwrap();

    c.bench_function("emit 64-register chain", |b| {
        b.iter(|| black_box(&ir).to_c())
    });
}

criterion_group!(benches, assemble_benchmark, emit_benchmark);
criterion_main!(benches);
