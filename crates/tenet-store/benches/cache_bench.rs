use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::sync::Arc;
use std::time::Duration;
use tenet_core::{Lookup, PropertyType};
use tenet_store::{
    CachedProperty, InMemoryResolver, Property, PropertyResolver, SqliteResolver, StoreConfig,
    StoreProperty,
};

const TENANT: u64 = 123456789012345678;

fn store_property(resolver: Arc<dyn PropertyResolver>) -> StoreProperty {
    let info = resolver
        .create_property_info("moderation", "max_mentions", true, PropertyType::Number)
        .unwrap();
    StoreProperty::new(info, resolver)
}

/// Benchmark: reads straight through the resolver vs through the tenant cache
fn bench_property_get(c: &mut Criterion) {
    let tenant = Lookup::new(TENANT).unwrap();
    let mut group = c.benchmark_group("property_get");

    let resolvers: Vec<(&str, Arc<dyn PropertyResolver>)> = vec![
        ("memory", Arc::new(InMemoryResolver::new()) as Arc<dyn PropertyResolver>),
        ("sqlite", Arc::new(SqliteResolver::open_in_memory().unwrap()) as Arc<dyn PropertyResolver>),
    ];

    for (name, resolver) in resolvers {
        let uncached = store_property(resolver);
        uncached.set(tenant, &5i32).unwrap();

        group.bench_with_input(BenchmarkId::new("uncached", name), &uncached, |b, p| {
            b.iter(|| std::hint::black_box(p.get(tenant).unwrap()))
        });

        let config = StoreConfig::builder()
            .default_ttl(Duration::from_secs(3600))
            .build()
            .unwrap();
        let cached = CachedProperty::new(uncached.clone(), &config);
        cached.get(tenant).unwrap();

        group.bench_with_input(BenchmarkId::new("cached", name), &cached, |b, p| {
            b.iter(|| std::hint::black_box(p.get(tenant).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark: decode of a cached mapping
fn bench_decode(c: &mut Criterion) {
    let tenant = Lookup::new(TENANT).unwrap();
    let cached = CachedProperty::new(
        store_property(Arc::new(InMemoryResolver::new())),
        &StoreConfig::default(),
    );
    let values: Vec<i64> = (0..256).collect();
    cached.set(tenant, &values).unwrap();

    c.bench_function("decode_i64_array_256", |b| {
        b.iter(|| {
            let mapping = cached.get(tenant).unwrap().unwrap();
            std::hint::black_box(mapping.as_i64_array().unwrap())
        })
    });
}

criterion_group!(benches, bench_property_get, bench_decode);
criterion_main!(benches);
