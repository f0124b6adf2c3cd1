//! Benchmark for inote parsing and comparison.

use std::fmt::Write as _;

use criterion::{Criterion, Throughput};
use maidata_diff::{
    diff::{DiffInput, compare},
    inote::parse_inote,
};

/// Builds notation of `bars` bars mixing every segment shape.
fn generate_notation(bars: usize) -> String {
    let mut notation = String::from("(180){8}");
    for bar in 0..bars {
        let lane = bar % 8 + 1;
        write!(
            notation,
            "{lane},{lane}h[4:1],,{lane}/{},12,{{16}}3-7>,,{{8}}(180)5xb$,",
            lane % 8 + 1
        )
        .expect("writing to a String never fails");
    }
    notation.push('E');
    notation
}

fn bench_parse_inote(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_inote");
    for bars in [16, 256, 4096] {
        let notation = generate_notation(bars);
        group.throughput(Throughput::Bytes(notation.len() as u64));
        group.bench_function(format!("{bars}_bars"), |b| {
            b.iter(|| parse_inote(std::hint::black_box(&notation)));
        });
    }
    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let left = generate_notation(1024);
    let right = left.replace("5xb$", "5bx").replacen("12,", "13,", 64);
    let (Ok(left_output), Ok(right_output)) = (parse_inote(&left), parse_inote(&right)) else {
        panic!("generated notation must parse");
    };

    let mut group = c.benchmark_group("compare");
    group.bench_function("1024_bars", |b| {
        b.iter(|| {
            compare(
                std::hint::black_box(DiffInput::new(&left_output.sequence, &left)),
                std::hint::black_box(DiffInput::new(&right_output.sequence, &right)),
            )
        });
    });
    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_parse_inote(&mut criterion);
    bench_compare(&mut criterion);
}
