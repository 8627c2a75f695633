use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dsv_core::{Reader, ReaderConfigBuilder};

fn synthetic_csv(rows: usize, cols: usize) -> Vec<u8> {
    let mut buf = String::new();
    for c in 0..cols {
        if c > 0 {
            buf.push(',');
        }
        buf.push_str(&format!("col{c}"));
    }
    buf.push('\n');
    for r in 0..rows {
        for c in 0..cols {
            if c > 0 {
                buf.push(',');
            }
            buf.push_str(&format!("{}", r * cols + c));
        }
        buf.push('\n');
    }
    buf.into_bytes()
}

fn bench_read(c: &mut Criterion) {
    let input = synthetic_csv(10_000, 12);
    let cfg = ReaderConfigBuilder::new()
        .header_start(Some(0))
        .data_start(1)
        .build();
    let reader = Reader::new(cfg);

    c.bench_function("read_10k_rows_12_cols", |b| {
        b.iter(|| reader.read(black_box(&input)).unwrap())
    });
}

criterion_group!(benches, bench_read);
criterion_main!(benches);
