use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hb_core::{demo_team_data, BallGame, Player, Team};

fn demo_team(name: &str) -> Team {
    let data = demo_team_data(name);
    let roster = data
        .players
        .iter()
        .map(|p| Player::new(p.name.clone(), p.attributes.clone()))
        .collect();
    Team::new(data.name, roster, 3).unwrap()
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("simulate_full_game", |b| {
        let home = demo_team("Gulls");
        let away = demo_team("Crabs");
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut game =
                BallGame::seeded(home.clone(), away.clone(), black_box(seed)).unwrap();
            black_box(game.run_to_completion().unwrap())
        });
    });
}

fn bench_single_tick(c: &mut Criterion) {
    c.bench_function("single_pitch_cycle", |b| {
        let home = demo_team("Gulls");
        let away = demo_team("Crabs");
        b.iter_batched(
            || {
                let mut game = BallGame::seeded(home.clone(), away.clone(), 7).unwrap();
                game.tick().unwrap(); // leave pre-game
                game
            },
            |mut game| black_box(game.tick().unwrap()),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_full_game, bench_single_tick);
criterion_main!(benches);
