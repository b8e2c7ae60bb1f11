use criterion::{criterion_group, criterion_main, Criterion};

use quince_chess::game_state::game_state::GameState;
use quince_chess::move_generation::perft::perft;

fn perft_benchmarks(c: &mut Criterion) {
    c.bench_function("perft starting position depth 3", |b| {
        b.iter(|| {
            let mut state = GameState::new_game();
            perft(&mut state, 3).expect("perft should run")
        })
    });

    c.bench_function("perft kiwipete depth 2", |b| {
        b.iter(|| {
            let mut state = GameState::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .expect("position should parse");
            perft(&mut state, 2).expect("perft should run")
        })
    });
}

criterion_group!(benches, perft_benchmarks);
criterion_main!(benches);
