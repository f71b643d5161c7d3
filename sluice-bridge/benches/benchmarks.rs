// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::bridge_bench::bench_bridge;
use criterion::{criterion_group, criterion_main};


criterion_group!(benches, bench_bridge);
criterion_main!(benches);
