use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skirmish::board::{Direction, Position, Side};
use skirmish::game::Match;
use skirmish::protocol::{decode_client_message, encode_server_message, ServerMessage};
use skirmish::resolve::plan_sweep;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn deployed_match() -> Match {
    let mut game = Match::new("alice", "bob");
    game.submit_placement(Side::A, &names(&["P1", "P2", "P3", "P4", "H1"]))
        .unwrap();
    game.submit_placement(Side::B, &names(&["H1", "P1", "P2", "P3", "P4"]))
        .unwrap();
    game
}

fn bench_plan_sweep(c: &mut Criterion) {
    let game = deployed_match();
    c.bench_function("plan_sweep_hero_forward", |b| {
        b.iter(|| {
            plan_sweep(
                black_box(game.board()),
                Side::A,
                black_box(Position::new(4, 4)),
                black_box(Position::new(2, 4)),
            )
        })
    });
}

fn bench_scripted_match(c: &mut Criterion) {
    let script = [
        (Side::A, "P1", Direction::Forward),
        (Side::B, "H1", Direction::Right),
        (Side::A, "P1", Direction::Forward),
        (Side::B, "H1", Direction::Right),
        (Side::A, "H1", Direction::Forward),
        (Side::B, "H1", Direction::Left),
        (Side::A, "H1", Direction::ForwardLeft),
    ];
    c.bench_function("scripted_match_to_victory", |b| {
        b.iter(|| {
            let mut game = deployed_match();
            for (side, unit, dir) in script {
                game.apply_move(side, unit, dir).unwrap();
            }
            black_box(game.winner())
        })
    });
}

fn bench_codec(c: &mut Criterion) {
    let snapshot = deployed_match().snapshot();
    let msg = ServerMessage::GameState(snapshot);
    c.bench_function("encode_game_state", |b| {
        b.iter(|| encode_server_message(black_box(&msg)).unwrap())
    });
    c.bench_function("decode_make_move", |b| {
        b.iter(|| decode_client_message(black_box(r#"{"type":"make_move","data":"H1:FL"}"#)).unwrap())
    });
}

criterion_group!(benches, bench_plan_sweep, bench_scripted_match, bench_codec);
criterion_main!(benches);
