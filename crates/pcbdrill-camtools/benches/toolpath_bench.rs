use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pcbdrill_camtools::{emit, parse, plan_drilling, CavalierOffset, ProgramHeader};
use pcbdrill_core::MillingParams;

/// A drill file with `count` holes spread over three tools.
fn drill_file(count: usize) -> String {
    let mut text = String::from("M48\nMETRIC,TZ\nT1C0.8\nT2C1.0\nT3C3.0\n%\n");
    for tool in 1..=3 {
        text.push_str(&format!("T{}\n", tool));
        for i in 0..count / 3 {
            text.push_str(&format!("X{:.3}Y{:.3}\n", i as f64 * 2.54, tool as f64 * 10.0));
        }
    }
    text.push_str("M30\n");
    text
}

fn bench_parse(c: &mut Criterion) {
    let text = drill_file(3000);
    c.bench_function("parse 3000 holes", |b| b.iter(|| parse(black_box(&text))));
}

fn bench_plan_and_emit(c: &mut Criterion) {
    let file = parse(&drill_file(3000)).expect("bench input parses");
    let params = MillingParams::default();
    let header = ProgramHeader::new("bench", "bench.drl", &params);

    c.bench_function("plan and emit 3000 holes", |b| {
        b.iter(|| {
            let plan = plan_drilling(black_box(&file), &params, Some(&CavalierOffset))
                .expect("plan succeeds");
            emit(&header, &plan.groups)
        })
    });
}

criterion_group!(benches, bench_parse, bench_plan_and_emit);
criterion_main!(benches);
