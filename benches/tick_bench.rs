//! Tick loop benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petri_colony::command::{InputEvent, InputFrame};
use petri_colony::core::config::SimulationConfig;
use petri_colony::entity::cell::CellTemplate;
use petri_colony::render::camera::Camera;
use petri_colony::simulation::eating::detect_meals;
use petri_colony::simulation::Simulation;
use petri_colony::spatial::sample_in_disk;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Arena with `population` cells spread over a disk, spawners off
fn crowded(population: usize) -> Simulation {
    let mut config = SimulationConfig::default();
    config.spawners.nutrient.rate = 0.0;
    config.spawners.rival.rate = 0.0;
    config.spawners.viral.rate = 0.0;
    let mut sim = Simulation::new(config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let radius = (population as f32).sqrt() * 2.0;

    for i in 0..population {
        let template = match i % 3 {
            0 => CellTemplate::player(),
            1 => CellTemplate::rival(),
            _ => CellTemplate::viral(),
        };
        sim.world.spawn_from_template(&template, sample_in_disk(&mut rng, radius));
    }
    sim
}

fn benchmark_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_tick");
    let camera = Camera::new(800.0, 600.0);
    let idle = InputFrame::new();

    for population in [100, 500, 2000].iter() {
        let mut sim = crowded(*population);

        group.bench_with_input(BenchmarkId::new("population", population), population, |b, _| {
            b.iter(|| {
                black_box(sim.step(&idle, &camera));
            });
        });
    }

    group.finish();
}

fn benchmark_meal_detection(c: &mut Criterion) {
    let mut sim = crowded(2000);
    sim.world.rebuild_spatial_index();
    let rules = sim.config.eating.clone();

    c.bench_function("detect_meals_serial", |b| {
        b.iter(|| black_box(detect_meals(&sim.world, &rules, usize::MAX)))
    });
    c.bench_function("detect_meals_parallel", |b| {
        b.iter(|| black_box(detect_meals(&sim.world, &rules, 0)))
    });
}

fn benchmark_group_signals(c: &mut Criterion) {
    let mut sim = crowded(500);
    let camera = Camera::new(800.0, 600.0);
    let mut frame = InputFrame::new();
    frame.push(InputEvent::SelectAll);
    sim.step(&frame, &camera);

    c.bench_function("group_signals_500", |b| b.iter(|| black_box(sim.group_signals())));
}

criterion_group!(benches, benchmark_tick, benchmark_meal_detection, benchmark_group_signals);
criterion_main!(benches);
