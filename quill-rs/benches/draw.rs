use criterion::{criterion_group, criterion_main, Criterion};
use std::{fs, path::Path, str::FromStr};

use quill_rs::{draw, Circuit, Program};

struct DrawBenchConfig {
    name: String,
    source: String,
}

/// The sample programs of the integration tests.
fn from_samples() -> Vec<DrawBenchConfig> {
    let samples = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/programs");
    let dir = fs::read_dir(samples).expect("failed to locate sample programs");

    dir.filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "qasm"))
        .map(|entry| DrawBenchConfig {
            name: entry.file_name().to_string_lossy().into_owned(),
            source: fs::read_to_string(entry.path()).expect("failed to read sample program"),
        })
        .collect()
}

/// A circuit of `num_qubits` qubits with `depth` layers of brickwork `cx` gates.
fn brickwork(num_qubits: usize, depth: usize) -> String {
    let mut source = format!("qreg q[{num_qubits}];\n");
    for layer in 0..depth {
        for qubit in (layer % 2..num_qubits.saturating_sub(1)).step_by(2) {
            source.push_str(&format!("h q[{qubit}];\ncx q[{qubit}], q[{}];\n", qubit + 1));
        }
    }
    source
}

fn benchmark_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("samples");
    for cfg in from_samples() {
        let circuit = Circuit::from_str(&cfg.source).expect("sample programs should resolve");
        group.bench_function(format!("parse {}", cfg.name), |b| {
            b.iter(|| {
                let _ = Program::from_str(&cfg.source);
            })
        });
        group.bench_function(format!("draw {}", cfg.name), |b| {
            b.iter(|| {
                let _ = draw(&circuit);
            })
        });
    }
    group.finish();
}

fn benchmark_brickwork(c: &mut Criterion) {
    let circuit = Circuit::from_str(&brickwork(20, 200)).expect("brickwork should resolve");
    let mut group = c.benchmark_group("brickwork");
    group.sample_size(20);
    group.bench_function("layers", |b| {
        b.iter(|| quill_rs::draw::layers(&circuit))
    });
    group.bench_function("draw", |b| {
        b.iter(|| {
            let _ = draw(&circuit);
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_samples, benchmark_brickwork);
criterion_main!(benches);
