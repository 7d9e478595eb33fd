/// Benchmarks for the client-side work around each page: query encoding, deep merging
/// of keyed pages, and unwrapping/deserializing records.
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hasoffers_client_sdk::PageData;
use hasoffers_client_sdk::query::Query;
use hasoffers_client_sdk::resource::normalize;
use hasoffers_client_sdk::types::Offer;
use serde_json::{Map, Value, json};

fn keyed_offers(start: usize, count: usize) -> Map<String, Value> {
    (start..start + count)
        .map(|id| {
            (
                id.to_string(),
                json!({
                    "Offer": {
                        "id": id.to_string(),
                        "name": format!("Offer {id}"),
                        "advertiser_id": "12",
                        "status": "active",
                        "default_payout": "1.50000",
                        "max_payout": "2.00000",
                        "currency": "USD",
                        "require_approval": "0",
                        "is_private": "1"
                    }
                }),
            )
        })
        .collect()
}

fn bench_query_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/to_query_string");

    let flat = Query::new()
        .with("NetworkId", "demo")
        .with("NetworkToken", "NETd3m0t0k3n")
        .with("Target", "Offer")
        .with("Method", "findAll")
        .with("limit", 1000)
        .with("page", 1);
    group.bench_function("flat", |b| {
        b.iter(|| std::hint::black_box(&flat).to_query_string());
    });

    let nested = flat
        .clone()
        .with(
            "filters",
            json!({
                "status": "active",
                "name": { "LIKE": "%summer sale%" },
                "id": (0..50).collect::<Vec<u32>>()
            }),
        )
        .with("fields", json!(["id", "name", "default_payout", "status"]))
        .with("sort", json!({ "name": "asc", "id": "desc" }));
    group.bench_function("nested", |b| {
        b.iter(|| std::hint::black_box(&nested).to_query_string());
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("query/merge");

    for size in [100_usize, 1000] {
        let first = Query::from(keyed_offers(0, size));
        let second = Query::from(keyed_offers(size / 2, size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut merged = first.clone();
                merged.merge(std::hint::black_box(second.clone()));
                merged
            });
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resource/normalize");

    for size in [100_usize, 1000] {
        let data = PageData::Mapping(keyed_offers(0, size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("untyped", size), &data, |b, data| {
            b.iter(|| normalize(std::hint::black_box(data.clone()), "Offer"));
        });
        group.bench_with_input(BenchmarkId::new("Offer", size), &data, |b, data| {
            b.iter(|| {
                normalize(std::hint::black_box(data.clone()), "Offer")
                    .into_iter()
                    .map(serde_json::from_value::<Offer>)
                    .collect::<Result<Vec<_>, _>>()
                    .expect("Deserialization should succeed")
            });
        });
    }

    group.finish();
}

criterion_group!(paging_benches, bench_query_string, bench_merge, bench_normalize);
criterion_main!(paging_benches);
