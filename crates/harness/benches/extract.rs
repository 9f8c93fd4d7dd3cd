use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use tricount_harness::{catalog::Method, input::synthetic::write_complete_graph, timing::parse};

#[derive(Clone, Copy)]
struct Input {
    name: &'static str,
    noise_lines: usize,
    nodes: usize,
}

const SMALL: Input = Input {
    name: "small",
    noise_lines: 100,
    nodes: 100,
};

const MEDIUM: Input = Input {
    name: "medium",
    noise_lines: 10_000,
    nodes: 1_000,
};

const LARGE: Input = Input {
    name: "large",
    noise_lines: 1_000_000,
    nodes: 3_000,
};

/// Program output with a time report for every method after every
/// `noise_lines / 7` lines of unrelated output.
fn program_output(noise_lines: usize) -> String {
    let mut output = String::new();
    for line in 0..noise_lines {
        output.push_str(&format!("iteration {line}: 42 triangles\n"));
        if line % (noise_lines / Method::ALL.len()).max(1) == 0 {
            let method = Method::ALL[line % Method::ALL.len()];
            output.push_str(&format!("{method} used time (in seconds): 0.{line}\n"));
        }
    }
    output
}

fn extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.sampling_mode(SamplingMode::Flat);

    for input in [SMALL, MEDIUM, LARGE] {
        let output = program_output(input.noise_lines);
        group.bench_function(input.name, |b| b.iter(|| black_box(parse(&output))));
    }

    group.finish();
}

fn complete_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("complete_graph");
    group.sampling_mode(SamplingMode::Flat);

    let runtime = tokio::runtime::Runtime::new().unwrap();

    for input in [SMALL, MEDIUM, LARGE] {
        group.bench_function(input.name, |b| {
            b.to_async(&runtime).iter(|| async {
                let mut sink = tokio::io::sink();
                black_box(write_complete_graph(&mut sink, input.nodes).await.unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, extract, complete_graph);
criterion_main!(benches);
