use criterion::{criterion_group, criterion_main, Criterion};
use snofam::table::SnoRow;
use snofam::CdSnoRna;

fn cd_row(strand: &str) -> SnoRow {
    let sequence = format!("{}ACGTATGA{}", "C".repeat(56), "C".repeat(16));
    SnoRow {
        start: String::from("1000"),
        end: (1000 + sequence.len()).to_string(),
        snor_id: String::from("SNORD1"),
        mod_type: String::from("CD"),
        strand: strand.to_string(),
        sequence,
        box_d: String::from("ATGA"),
        box_c: String::from("TTTT"),
        ..SnoRow::default()
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let forward = cd_row("+");
    let reverse = cd_row("-");
    c.bench_function("locate D-box +", |b| {
        b.iter(|| CdSnoRna::new(&forward, false))
    });
    c.bench_function("locate D-box - with switch", |b| {
        b.iter(|| CdSnoRna::new(&reverse, true))
    });

    let snor = CdSnoRna::new(&forward, false).unwrap();
    c.bench_function("interaction region 20", |b| {
        b.iter(|| snor.d_interaction_region(20).len())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
