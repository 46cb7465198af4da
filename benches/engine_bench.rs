use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use cric_score::cli::{parse_script, play_script};
use cric_score::events::MatchEvent;
use cric_score::models::MatchConfig;
use cric_score::stats;
use cric_score::state::Innings;
use cric_score::store::MatchStore;

const OVER: &str = "1 4 wd 0 2 nb1 6 0 ";

fn build_config(overs: u32) -> MatchConfig {
    MatchConfig {
        overs,
        ..MatchConfig::default()
    }
}

/// First innings of `overs` overs, then a chase that ends on the target.
fn build_script(overs: u32) -> Vec<MatchEvent> {
    let mut script = OVER.repeat(overs as usize);
    script.push_str("next-innings ");
    script.push_str(&OVER.repeat(overs as usize - 1));
    script.push_str("6 6 6");
    parse_script(&script).expect("script should parse")
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for overs in [5, 20, 50] {
        let config = build_config(overs);
        let events = build_script(overs);
        group.bench_with_input(
            BenchmarkId::new("full-match", overs),
            &(config, events),
            |b, (config, events)| {
                b.iter_batched(
                    || {
                        let mut store = MatchStore::new(config.clone()).expect("config is valid");
                        store.start_match().expect("match should start");
                        (store, events.clone())
                    },
                    |(mut store, events)| {
                        play_script(&mut store, events).expect("replay should succeed");
                        black_box(store);
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let config = build_config(50);
    let mut store = MatchStore::new(config).expect("config is valid");
    store.start_match().expect("match should start");
    play_script(&mut store, build_script(50)).expect("replay should succeed");
    let state = store.state().clone();

    c.bench_function("verify/50-overs", |b| {
        b.iter(|| {
            for which in [Innings::First, Innings::Second] {
                black_box(stats::verify(state.innings(which), which)).expect("innings verifies");
            }
        });
    });
}

criterion_group!(benches, bench_replay, bench_verify);
criterion_main!(benches);
