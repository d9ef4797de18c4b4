use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use ferrous_ioc::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn source_tree(modules: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("src");
    fs::create_dir_all(&root).unwrap();
    for module in modules {
        fs::write(root.join(format!("{}.rs", module)), "").unwrap();
    }
    (dir, root)
}

trait Sink: Send + Sync {
    fn write(&self, bytes: usize) -> usize;
}

#[derive(Default)]
struct NullSink;

impl Sink for NullSink {
    fn write(&self, bytes: usize) -> usize {
        bytes
    }
}

#[derive(Default)]
struct Config;

#[derive(Default)]
struct Buffer {
    sink: Inject<dyn Sink>,
}

#[derive(Default)]
struct Request {
    config: Inject<Config>,
    buffer: Inject<Buffer>,
}

fn types() -> TypeSystem {
    TypeSystem::new()
        .with(TypeDescriptor::managed::<Config>("config").default_constructor().build())
        .with(
            TypeDescriptor::managed::<NullSink>("null_sink")
                .default_constructor()
                .implements::<dyn Sink>(|s| s as Arc<dyn Sink>)
                .build(),
        )
        .with(
            TypeDescriptor::managed::<Buffer>("buffer")
                .multiple()
                .default_constructor()
                .inject_capability::<dyn Sink>("sink", |b| &b.sink)
                .build(),
        )
        .with(
            TypeDescriptor::managed::<Request>("request")
                .multiple()
                .default_constructor()
                .inject::<Config>("config", |r| &r.config)
                .inject::<Buffer>("buffer", |r| &r.buffer)
                .method("init", |r| {
                    black_box(r.buffer.get().sink.get().write(64));
                })
                .build(),
        )
}

const MODULES: [&str; 4] = ["buffer", "config", "null_sink", "request"];

// ===== Micro Benchmarks =====

fn bench_singleton_hit(c: &mut Criterion) {
    let (_dir, root) = source_tree(&MODULES);
    let handle = Container::new(types()).start(&root).unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = handle.resolve::<Config>().unwrap();
            black_box(v);
        })
    });
}

fn bench_prototype_graph(c: &mut Criterion) {
    let (_dir, root) = source_tree(&MODULES);
    let handle = Container::new(types()).start(&root).unwrap();

    let mut group = c.benchmark_group("prototype");
    group.bench_function("leaf_with_capability", |b| {
        b.iter(|| black_box(handle.resolve::<Buffer>().unwrap()))
    });
    group.bench_function("two_level_with_init", |b| {
        b.iter(|| black_box(handle.resolve::<Request>().unwrap()))
    });
    group.finish();
}

fn bench_capability_resolution(c: &mut Criterion) {
    let (_dir, root) = source_tree(&MODULES);
    let handle = Container::new(types()).start(&root).unwrap();
    let catalog = handle.catalog();
    let key = key_of_capability::<dyn Sink>();

    c.bench_function("resolve_by_capability", |b| {
        b.iter(|| black_box(catalog.resolve_by_capability(&key).unwrap()))
    });
}

// ===== Macro Benchmarks =====

fn bench_start(c: &mut Criterion) {
    let (_dir, root) = source_tree(&MODULES);

    c.bench_function("start_small_tree", |b| {
        b.iter_batched(
            || Container::new(types()),
            |container| black_box(container.start(&root).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");
    let layout = SourceLayout::default();

    for files in [10usize, 100, 1000] {
        let names: Vec<String> = (0..files).map(|i| format!("module_{:04}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (_dir, root) = source_tree(&refs);

        group.bench_with_input(BenchmarkId::from_parameter(files), &root, |b, root| {
            b.iter(|| black_box(catalog::discovery::source_names(root, &layout).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    micro_benches,
    bench_singleton_hit,
    bench_prototype_graph,
    bench_capability_resolution
);

criterion_group!(macro_benches, bench_start, bench_discovery);

criterion_main!(micro_benches, macro_benches);
