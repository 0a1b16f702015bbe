//! Per-frame cost of the transform and of the full bins-to-pixels path.
//!
//! Run with: cargo bench -p spectrum-leds

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_complex::Complex32;
use spectrum_leds::config::{Config, FftVariant, Window};
use spectrum_leds::pipeline::Visualizer;
use spectrum_leds::spectrum::FftPlan;

fn test_signal(len: usize) -> Vec<Complex32> {
    (0..len)
        .map(|i| Complex32::new((i as f32 * 0.37).sin() + 0.25 * (i as f32 * 1.9).cos(), 0.0))
        .collect()
}

fn benchmark_fft_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");

    for len in [64usize, 256, 1024] {
        let plan = FftPlan::new(len).unwrap();
        let input = test_signal(len);
        group.throughput(Throughput::Elements(len as u64));

        for (name, variant) in [
            ("dit", FftVariant::DecimationInTime),
            ("dif", FftVariant::DecimationInFrequency),
        ] {
            group.bench_with_input(BenchmarkId::new(name, len), &input, |b, input| {
                let mut data = input.clone();
                b.iter(|| {
                    data.copy_from_slice(input);
                    plan.process(black_box(&mut data), variant);
                });
            });
        }
    }

    group.finish();
}

fn benchmark_frame_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    for (sample_count, window) in [(64usize, Window::None), (64, Window::Hann), (256, Window::Hann)] {
        let config = Config {
            sample_count,
            window,
            full_scale: 1 << 20,
            ..Config::default()
        };
        let pixel_count = config.pixel_count;
        let mut visualizer = Visualizer::new(config).unwrap();
        let frame: Vec<i32> = test_signal(sample_count)
            .iter()
            .map(|x| (x.re * 0.5 * (1 << 20) as f32) as i32)
            .collect();
        let mut pixels = vec![0u32; pixel_count];

        group.bench_function(format!("{sample_count}_samples_{window:?}"), |b| {
            b.iter(|| visualizer.render(black_box(&frame), black_box(&mut pixels)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_fft_variants, benchmark_frame_render);
criterion_main!(benches);
