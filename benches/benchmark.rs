// Catalog build and query benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use homex::prelude::*;
use std::sync::Arc;

const FACILITIES: [&str; 12] = [
    "Swimming Pool", "Gym", "Club House", "Power Backup", "Lift", "Security",
    "Jogging Track", "Park", "Intercom", "Rain Water Harvesting", "Spa", "Indoor Games",
];

const LANDMARKS: [&str; 8] = [
    "Cyber City", "Airport", "Metro Station", "Golf Course Road",
    "Sohna Road", "Huda City Centre", "Ambience Mall", "Medanta Hospital",
];

fn generate_record(i: usize) -> PropertyRecord {
    let facilities: Vec<String> = (0..5)
        .map(|j| format!("'{}'", FACILITIES[(i * 7 + j * 3) % FACILITIES.len()]))
        .collect();
    let bhk = 1 + i % 4;
    let area = 600 + (i * 37) % 1800;
    let details = format!(
        "{{'{} BHK': {{'building_type': '{}', 'area': '{} - {} sq.ft.', 'price-range': '₹{} L - ₹{:.1} Cr'}}}}",
        bhk,
        if i % 3 == 0 { "Independent Floor" } else { "Apartment" },
        area,
        area + 250,
        40 + i % 50,
        1.0 + (i % 20) as f64 / 10.0,
    );
    let landmarks: Vec<String> = (0..4)
        .map(|j| {
            let name = LANDMARKS[(i + j * 2) % LANDMARKS.len()];
            format!("'{}': '{:.1} Km'", name, 0.5 + ((i * 13 + j * 29) % 400) as f64 / 10.0)
        })
        .collect();

    PropertyRecord::new(format!("Property {}", i))
        .with_sub_name(format!("Sector {}", i % 90))
        .with_top_facilities(format!("[{}]", facilities.join(", ")))
        .with_price_details(details)
        .with_location_advantages(format!("{{{}}}", landmarks.join(", ")))
}

fn generate_catalog(size: usize) -> Vec<PropertyRecord> {
    (0..size).map(generate_record).collect()
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_build");
    group.sample_size(10);

    for size in [100, 500, 1000].iter() {
        let records = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("build", size), &records, |b, records| {
            b.iter(|| {
                CatalogSnapshot::build(
                    black_box(records.clone()),
                    ConfigurationSchema::default(),
                    FusionWeights::default(),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let snapshot = CatalogSnapshot::build(
        generate_catalog(1000),
        ConfigurationSchema::default(),
        FusionWeights::default(),
    )
    .unwrap();
    let facade = QueryFacade::new(Arc::new(snapshot));

    c.bench_function("recommend_k5", |b| {
        b.iter(|| facade.recommend(black_box("Property 500"), DEFAULT_K).unwrap());
    });

    c.bench_function("search_nearby_20km", |b| {
        b.iter(|| facade.search_nearby(black_box("Cyber City"), DEFAULT_RADIUS_KM).unwrap());
    });
}

criterion_group!(benches, benchmark_build, benchmark_queries);
criterion_main!(benches);
