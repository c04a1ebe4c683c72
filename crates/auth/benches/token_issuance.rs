//! Benchmarks for token minting and verification.
//!
//! Run with: `cargo bench -p cpfauth-auth`

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cpfauth_auth::{TokenIssuer, TokenVerifier};
use cpfauth_core::UserRecord;

const SECRET: &str = "bench-secret-bench-secret-bench-secret";

fn bench_issue(c: &mut Criterion) {
    let issuer = TokenIssuer::new(SECRET);
    let user = UserRecord::new(42, "alice", "a@x.com");

    c.bench_function("issue_hs256", |b| {
        b.iter(|| issuer.issue(black_box(&user)).expect("issue"))
    });
}

fn bench_verify(c: &mut Criterion) {
    let issuer = TokenIssuer::new(SECRET);
    let verifier = TokenVerifier::new(SECRET);
    let user = UserRecord::new(42, "alice", "a@x.com");
    let now = Utc::now();
    let token = issuer.issue_at(&user, now).expect("issue").token;

    c.bench_function("verify_hs256", |b| {
        b.iter(|| verifier.verify(black_box(&token), now).expect("verify"))
    });
}

criterion_group!(benches, bench_issue, bench_verify);
criterion_main!(benches);
