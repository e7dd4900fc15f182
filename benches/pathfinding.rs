use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::HashSet;
use undercroft::{
    autotile_mask, chase_step, explore_step, FloorContext, GenerationConfig, Position,
    TerrainGrid, TerrainKind, VisibilityState,
};

fn generated_floor() -> FloorContext {
    FloorContext::generate(&GenerationConfig::new(12345)).expect("benchmark floor generates")
}

fn bench_chase_open_floor(c: &mut Criterion) {
    let grid = TerrainGrid::filled(60, 30, TerrainKind::Ground);
    let obstacles = HashSet::new();

    c.bench_function("chase_open_floor", |b| {
        b.iter(|| {
            chase_step(
                black_box(Position::new(10, 10)),
                black_box(Position::new(15, 14)),
                &grid,
                &obstacles,
            )
        })
    });
}

fn bench_chase_generated(c: &mut Criterion) {
    let floor = generated_floor();
    let start = floor.player_start();
    let hunter = floor
        .grid()
        .ground_positions()
        .find(|pos| (2..=5).contains(&pos.chebyshev_distance(start)))
        .unwrap_or(start);
    let obstacles = HashSet::new();

    c.bench_function("chase_generated_floor", |b| {
        b.iter(|| floor.chase_step(black_box(hunter), black_box(start), &obstacles))
    });
}

fn bench_explore_fresh_floor(c: &mut Criterion) {
    let floor = generated_floor();
    let start = floor.player_start();
    let obstacles = HashSet::new();

    c.bench_function("explore_fresh_floor", |b| {
        b.iter(|| floor.explore_step(black_box(start), &obstacles))
    });
}

fn bench_explore_mostly_seen(c: &mut Criterion) {
    let floor = generated_floor();
    let start = floor.player_start();
    let mut visibility = VisibilityState::for_grid(floor.grid());
    // Leave only the far corner unseen so the search covers most of the floor
    for pos in floor.grid().ground_positions() {
        if pos.manhattan_distance(start) < 60 {
            visibility.mark_visited(pos);
        }
    }
    let obstacles = HashSet::new();

    c.bench_function("explore_mostly_seen", |b| {
        b.iter(|| explore_step(black_box(start), floor.grid(), &visibility, &obstacles))
    });
}

fn bench_reveal_area(c: &mut Criterion) {
    let floor = generated_floor();
    let mut visibility = VisibilityState::for_grid(floor.grid());

    c.bench_function("reveal_area_radius_4", |b| {
        b.iter(|| visibility.reveal_area(black_box(Position::new(30, 15)), 4))
    });
}

fn bench_autotile_floor(c: &mut Criterion) {
    let floor = generated_floor();
    let grid = floor.grid();

    c.bench_function("autotile_whole_floor", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for y in 0..grid.height as i32 {
                for x in 0..grid.width as i32 {
                    total += autotile_mask(grid, x, y).len();
                }
            }
            total
        })
    });
}

criterion_group!(
    benches,
    bench_chase_open_floor,
    bench_chase_generated,
    bench_explore_fresh_floor,
    bench_explore_mostly_seen,
    bench_reveal_area,
    bench_autotile_floor
);
criterion_main!(benches);
