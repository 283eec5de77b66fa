//! Benchmarks for the closure computation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use catrefine::engine::{Engine, EngineConfig};

/// A synthetic relation over `symbols` names with a few overlapping sets.
fn synthetic(symbols: usize, triples: usize, sets: usize) -> Engine {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let names: Vec<String> = (0..symbols).map(|i| format!("n{i}")).collect();

    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    for name in &names {
        engine.intern_symbol(name).unwrap();
    }
    for _ in 0..triples {
        let s = &names[rng.gen_range(0..symbols)];
        let p = &names[rng.gen_range(0..symbols)];
        let o = &names[rng.gen_range(0..symbols)];
        engine.add_triple(s, p, o).unwrap();
    }
    for _ in 0..sets {
        let members: Vec<&String> = names.choose_multiple(&mut rng, 3).collect();
        let members: Vec<&str> = members.iter().map(|s| s.as_str()).collect();
        engine.add_set(members.as_slice()).unwrap();
    }
    engine
}

fn bench_closure_small(c: &mut Criterion) {
    c.bench_function("closure_8sym_24facts", |bench| {
        bench.iter(|| black_box(synthetic(8, 24, 3).run().unwrap()))
    });
}

fn bench_closure_medium(c: &mut Criterion) {
    c.bench_function("closure_16sym_64facts", |bench| {
        bench.iter(|| black_box(synthetic(16, 64, 4).run().unwrap()))
    });
}

criterion_group!(benches, bench_closure_small, bench_closure_medium);
criterion_main!(benches);
