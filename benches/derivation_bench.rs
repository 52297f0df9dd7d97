//! 派生性能基准测试
//! 使用criterion进行性能测试

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ironseed::domain::{allocate, ChainVariant, DerivationEngine, DerivationPath, Mnemonic};

const TEST_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_seed_stretching(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(TEST_MNEMONIC).unwrap();
    c.bench_function("bip39_to_seed", |b| {
        b.iter(|| black_box(mnemonic.to_seed(black_box(""))))
    });
}

fn bench_derive_per_chain(c: &mut Criterion) {
    let engine = DerivationEngine::default();
    let mnemonic = Mnemonic::parse(TEST_MNEMONIC).unwrap();

    for chain in ChainVariant::ALL {
        let path = allocate(chain, 0);
        c.bench_function(&format!("derive_{}", chain), |b| {
            b.iter(|| black_box(engine.derive(chain, &mnemonic, black_box(&path)).unwrap()))
        });
    }
}

fn bench_path_parsing(c: &mut Criterion) {
    c.bench_function("parse_derivation_path", |b| {
        b.iter(|| black_box(DerivationPath::parse(black_box("m/44'/60'/12'/0/7")).unwrap()))
    });
}

criterion_group!(benches, bench_seed_stretching, bench_derive_per_chain, bench_path_parsing);
criterion_main!(benches);
