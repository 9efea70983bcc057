//! Benchmarks for stabilizer tableau operations on board-sized registers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qmine_core::CliffordGate;
use qmine_state::{DenseState, StabilizerState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Entangle neighbouring pairs so measurements hit the random branch
fn entangled(num_qubits: usize) -> StabilizerState {
    let mut state = StabilizerState::new(num_qubits).unwrap();
    for q in (0..num_qubits - 1).step_by(2) {
        state.apply_gate(CliffordGate::H, &[q]).unwrap();
        state.apply_gate(CliffordGate::CX, &[q, q + 1]).unwrap();
    }
    state
}

fn bench_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("tableau_gates");

    for num_qubits in [16usize, 100, 400, 2500] {
        group.throughput(Throughput::Elements(num_qubits as u64));
        group.bench_with_input(
            BenchmarkId::new("h_cx_layer", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut state = StabilizerState::new(n).unwrap();
                b.iter(|| {
                    for q in 0..n - 1 {
                        state.apply_gate(CliffordGate::H, &[q]).unwrap();
                        state.apply_gate(CliffordGate::CX, black_box(&[q, q + 1])).unwrap();
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_measurement(c: &mut Criterion) {
    let mut group = c.benchmark_group("tableau_measure_z");

    for num_qubits in [100usize, 400, 2500] {
        group.bench_with_input(
            BenchmarkId::new("random_branch", num_qubits),
            &num_qubits,
            |b, &n| {
                let mut rng = ChaCha8Rng::seed_from_u64(7);
                let mut draw = move || rng.gen::<f64>();
                b.iter_batched(
                    || entangled(n),
                    |mut state| {
                        for q in (0..n).step_by(2) {
                            black_box(state.measure_z(q, &mut draw).unwrap());
                        }
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );

        group.bench_with_input(
            BenchmarkId::new("expectation_z", num_qubits),
            &num_qubits,
            |b, &n| {
                let state = entangled(n);
                b.iter(|| {
                    for q in 0..n {
                        black_box(state.expectation_z(q).unwrap());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_dense_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_measure_z");

    for num_qubits in [8usize, 12, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_qubits),
            &num_qubits,
            |b, &n| {
                let mut draw = || 0.25;
                b.iter_batched(
                    || {
                        let mut state = DenseState::new(n).unwrap();
                        state
                            .apply_single_qubit_gate(&qmine_gates::matrices::HADAMARD, 0)
                            .unwrap();
                        state
                    },
                    |mut state| black_box(state.measure_z(0, &mut draw).unwrap()),
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_gates, bench_measurement, bench_dense_reference);
criterion_main!(benches);
