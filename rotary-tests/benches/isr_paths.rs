//! Cost of the interrupt-context entry points

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rotary_core::test_utils::quadrature::{full_step, half_step};
use rotary_core::{
    ButtonLevel, Direction, ListenerResult, RangeMode, RangePolicy, RotaryConfig, RotaryCore,
    ValueChanged,
};

fn bench_rotary_edge(c: &mut Criterion) {
    let cw = full_step(Direction::Clockwise);

    let core: RotaryCore<'static> =
        RotaryCore::new(0, RotaryConfig::default(), ButtonLevel::Released).unwrap();
    c.bench_function("full_step_detent", |b| {
        b.iter(|| {
            for &(clk, dt) in &cw {
                black_box(core.on_rotary_edge(clk, dt, 0));
            }
        })
    });

    let half: RotaryCore<'static> = RotaryCore::new(
        0,
        RotaryConfig::default().with_half_step(true),
        ButtonLevel::Released,
    )
    .unwrap();
    let cycle = half_step(Direction::Clockwise);
    c.bench_function("half_step_cycle", |b| {
        b.iter(|| {
            for &(clk, dt) in &cycle {
                black_box(half.on_rotary_edge(clk, dt, 0));
            }
        })
    });

    let sink = |event: ValueChanged| -> ListenerResult {
        black_box(event);
        Ok(())
    };
    let mut listened: RotaryCore<'_> =
        RotaryCore::new(0, RotaryConfig::default(), ButtonLevel::Released).unwrap();
    for _ in 0..4 {
        listened.add_value_listener(&sink).unwrap();
    }
    c.bench_function("full_step_detent_4_listeners", |b| {
        b.iter(|| {
            for &(clk, dt) in &cw {
                black_box(listened.on_rotary_edge(clk, dt, 0));
            }
        })
    });
}

fn bench_button(c: &mut Criterion) {
    let core: RotaryCore<'static> =
        RotaryCore::new(0, RotaryConfig::default(), ButtonLevel::Released).unwrap();
    let mut now = 0u32;

    c.bench_function("click_and_settle", |b| {
        b.iter(|| {
            core.on_button_edge(ButtonLevel::Pressed, now);
            core.on_button_edge(ButtonLevel::Released, now.wrapping_add(50));
            black_box(core.on_tick(now.wrapping_add(300)));
            now = now.wrapping_add(1_000);
        })
    });
}

fn bench_range(c: &mut Criterion) {
    c.bench_function("wrap_policy", |b| {
        b.iter(|| {
            RangePolicy::apply(
                black_box(-3),
                black_box(-17),
                black_box(0),
                black_box(9),
                RangeMode::Wrap,
            )
        })
    });
}

criterion_group!(benches, bench_rotary_edge, bench_button, bench_range);
criterion_main!(benches);
