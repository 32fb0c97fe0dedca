use criterion::{criterion_group, criterion_main, Criterion};
use opendraw::draw::canvas::Canvas;
use opendraw::draw::model::BrushSettings;
use opendraw::draw::render::render_stroke;
use opendraw::draw::stroke::Sample;

fn wavy_samples(count: usize) -> Vec<Sample> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            let x = 40.0 + t * 1800.0;
            let y = 540.0 + (t * 40.0).sin() * 300.0;
            Sample::new((x, y), 0.5 + 0.5 * (t * 7.0).cos().abs())
        })
        .collect()
}

fn bench_render_stroke(c: &mut Criterion) {
    let samples = wavy_samples(500);
    let brush = BrushSettings::default();
    c.bench_function("render_stroke_500_samples_1080p", |b| {
        b.iter(|| {
            let mut canvas = Canvas::new(1920, 1080);
            render_stroke(&mut canvas, &samples, &brush)
        })
    });
}

criterion_group!(benches, bench_render_stroke);
criterion_main!(benches);
