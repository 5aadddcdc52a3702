use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use process_memory_utils::code::parse;
use process_memory_utils::{
    resolve, Address, MemoryImage, MemoryReader, ModuleTable, ResolveOptions, ValueKind,
};

const MAIN: Address = Address::new(0x0040_0000);

/// Image with a pointer chain `depth` links deep starting at base+10
fn chain_image(depth: usize) -> (MemoryImage, String) {
    let image = MemoryImage::new();
    let mut slot = MAIN.offset(0x10);
    let mut code = String::from("base+10");

    for level in 0..depth {
        let next = Address::new(0x0100_0000 + level * 0x1000);
        image.map_pointer(slot, next, 4);
        slot = next.offset(0x8);
        code.push_str(",8");
    }
    image.map(slot, vec![0; 4]);
    (image, code)
}

fn benchmark_parse(c: &mut Criterion) {
    let modules: ModuleTable = [("game.exe", MAIN), ("engine.dll", Address::new(0x7000_0000))]
        .into_iter()
        .collect();

    c.bench_function("parse_chain_code", |b| {
        b.iter(|| parse(black_box("engine.dll+00A1B2C4,10,4,-8,1C"), &modules))
    });
}

fn benchmark_resolve(c: &mut Criterion) {
    let modules: ModuleTable = [("game.exe", MAIN)].into_iter().collect();
    let mut group = c.benchmark_group("resolve_chain");

    for depth in [0usize, 1, 4, 8] {
        let (image, code) = chain_image(depth);
        let spec = parse(&code, &modules).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(depth), &spec, |b, spec| {
            b.iter(|| resolve(spec, &modules, MAIN, &image, ResolveOptions::default()))
        });
    }
    group.finish();
}

fn benchmark_resolve_and_read(c: &mut Criterion) {
    let modules: ModuleTable = [("game.exe", MAIN)].into_iter().collect();
    let (image, code) = chain_image(4);
    let spec = parse(&code, &modules).unwrap();

    c.bench_function("resolve_and_read_int", |b| {
        b.iter(|| {
            let address = resolve(&spec, &modules, MAIN, &image, ResolveOptions::default());
            MemoryReader::new(&image).read_value(black_box(address), ValueKind::Int)
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_resolve,
    benchmark_resolve_and_read
);
criterion_main!(benches);
