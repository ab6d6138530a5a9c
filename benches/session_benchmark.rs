// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use criterion::{criterion_group, criterion_main, Criterion};
use daily_tips::config::{Config, SESSION_TTL};
use daily_tips::services::{CsrfService, SessionService};
use std::hint::black_box;

fn benchmark_session_cookies(c: &mut Criterion) {
    let config = Config::test_default();
    let sessions = SessionService::new(&config);
    let cookie = sessions
        .mint("bench-user", 1_700_000_000, SESSION_TTL)
        .expect("Failed to mint session");

    let mut group = c.benchmark_group("session_cookie");

    group.bench_function("mint", |b| {
        b.iter(|| sessions.mint(black_box("bench-user"), 1_700_000_000, SESSION_TTL))
    });

    group.bench_function("decode", |b| b.iter(|| sessions.decode(black_box(&cookie))));

    group.finish();
}

fn benchmark_csrf(c: &mut Criterion) {
    let csrf = CsrfService::new(&Config::test_default());
    let token = csrf.issue().expect("Failed to issue CSRF token");

    let mut group = c.benchmark_group("csrf");

    group.bench_function("issue", |b| b.iter(|| csrf.issue()));

    group.bench_function("verify_pair", |b| {
        b.iter(|| csrf.verify_pair(black_box(Some(&token)), black_box(&token)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_session_cookies, benchmark_csrf);
criterion_main!(benches);
