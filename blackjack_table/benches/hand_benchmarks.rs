use blackjack_table::{
    Card, HouseRules, InMemoryLedger, Rank, SessionRegistry, ShoeSupplier, Suit, TableConfig,
    TableSession, TurnSequencer, score,
    supplier::Shoe,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::StdRng};
use std::{hint::black_box, sync::Arc};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Benchmark scoring a two-card blackjack
fn bench_score_2_cards(c: &mut Criterion) {
    let cards = vec![Card::new(Rank::Ace, Suit::Spade), Card::new(Rank::King, Suit::Heart)];

    c.bench_function("score_2_cards", |b| {
        b.iter(|| score(black_box(&cards)));
    });
}

/// Benchmark scoring hands of many aces, the worst case for demotion
fn bench_score_aces(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_aces");

    for n_aces in [2, 4, 8] {
        let cards: Vec<Card> = (0..n_aces)
            .map(|idx| Card::new(Rank::Ace, Suit::ALL[idx % 4]))
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_aces", n_aces)),
            &cards,
            |b, cards| b.iter(|| score(black_box(cards))),
        );
    }

    group.finish();
}

/// Benchmark shuffling a six-deck shoe
fn bench_shoe_shuffle(c: &mut Criterion) {
    let mut shoe = Shoe::new(6);
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("shoe_shuffle_6_decks", |b| {
        b.iter(|| shoe.shuffle(&mut rng));
    });
}

/// Benchmark one round driven directly through the sequencer
fn bench_sequencer_round(c: &mut Criterion) {
    let rt = runtime();
    let rules = HouseRules::default();
    let mut group = c.benchmark_group("sequencer_round");

    for n_players in [1, 4, 7] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            &n_players,
            |b, &n_players| {
                b.iter(|| {
                    rt.block_on(async {
                        let supplier = ShoeSupplier::with_seed(1, 7);
                        let sequencer = TurnSequencer::new(&supplier, &rules);
                        let mut session = TableSession::new(1);
                        for player_id in 0..n_players {
                            sequencer.bet(&mut session, player_id, 10).await.unwrap();
                        }
                        for player_id in 0..n_players {
                            sequencer.stay(&mut session, player_id).await.unwrap();
                        }
                        session
                    })
                });
            },
        );
    }

    group.finish();
}

/// Benchmark a bet/stay round through the registry and table actor
fn bench_registry_round(c: &mut Criterion) {
    let rt = runtime();
    let registry = SessionRegistry::new(
        TableConfig::default(),
        Arc::new(ShoeSupplier::with_seed(8, 7)),
        Arc::new(InMemoryLedger::new(1_000_000)),
    );

    c.bench_function("registry_round", |b| {
        b.iter(|| {
            rt.block_on(async {
                registry.bet(1, 1, 10).await.unwrap();
                registry.stay(1, 1).await.unwrap();
                registry.play_again(1, 1).await.unwrap()
            })
        });
    });
}

criterion_group!(
    scoring,
    bench_score_2_cards,
    bench_score_aces,
    bench_shoe_shuffle
);

criterion_group!(rounds, bench_sequencer_round, bench_registry_round);

criterion_main!(scoring, rounds);
