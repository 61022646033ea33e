// Integration tests for homex
use homex::parse::try_parse_price_range;
use homex::prelude::*;
use homex::{ProximityIndex, SENTINEL_DISTANCE_M};
use std::path::Path;
use std::sync::Arc;

const HEADER: &str =
    "PropertyName,PropertySubName,NearbyLocations,TopFacilities,PriceDetails,LocationAdvantages\n";

fn csv_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn write_dataset(path: &Path, rows: &[PropertyRecord]) {
    let mut out = HEADER.to_string();
    for r in rows {
        out.push_str(
            &[
                csv_field(&r.name),
                csv_field(&r.sub_name),
                csv_field(&r.nearby_locations),
                csv_field(&r.top_facilities),
                csv_field(&r.price_details),
                csv_field(&r.location_advantages),
            ]
            .join(","),
        );
        out.push('\n');
    }
    std::fs::write(path, out).unwrap();
}

fn facade(records: Vec<PropertyRecord>) -> QueryFacade {
    let snapshot =
        CatalogSnapshot::build(records, ConfigurationSchema::default(), FusionWeights::default())
            .unwrap();
    QueryFacade::new(Arc::new(snapshot))
}

fn sample_catalog() -> Vec<PropertyRecord> {
    let facilities = [
        "['Swimming Pool', 'Gym', 'Club House', 'Power Backup']",
        "['Swimming Pool', 'Gym', 'Jogging Track']",
        "['Lift', 'Power Backup', 'Security']",
        "['Gym', 'Lift']",
        "[]",
        "['Swimming Pool', 'Gym', 'Club House', 'Power Backup']",
        "['Helipad', 'Golf Course']",
    ];
    let details = [
        "{'2 BHK': {'building_type': 'Apartment', 'area': '1,050 sq.ft.', 'price-range': '₹80 L - ₹1.1 Cr'}, '3 BHK': {'building_type': 'Apartment', 'area': '1,600 - 1,900 sq.ft.', 'price-range': '₹1.4 Cr - ₹1.8 Cr'}}",
        "{'2 BHK': {'building_type': 'Apartment', 'area': '980 sq.ft.', 'price-range': '₹75 L - ₹95 L'}}",
        "{'3 BHK': {'building_type': 'Independent Floor', 'area': '2,000 sq.ft.', 'price-range': '₹2 Cr - ₹2.4 Cr'}}",
        "not a blob",
        "{'Land': {'building_type': '', 'area': '2,500 sq.ft.', 'price-range': '₹3 Cr - ₹5 Cr'}}",
        "{'2 BHK': {'building_type': 'Apartment', 'area': '1,050 sq.ft.', 'price-range': '₹80 L - ₹1.1 Cr'}}",
        "{'4 BHK': {'building_type': 'Villa', 'area': '4,000 sq.ft.', 'price-range': '₹6 Cr - ₹8 Cr'}}",
    ];
    let landmarks = [
        "{'Cyber City': '4 Km', 'Airport': '12 Km'}",
        "{'Cyber City': '6.5 Km', 'Metro Station': '800 Meter'}",
        "{'Airport': '3 KM'}",
        "{'Cyber City': '25 Km', 'Metro Station': '2 Km'}",
        "garbage",
        "{'Cyber City': '4 Km', 'Airport': '12 Km'}",
        "{'Golf Course Road': '1 Km', 'Cyber City': '10 mins'}",
    ];

    (0..7)
        .map(|i| {
            PropertyRecord::new(format!("Property {}", i))
                .with_sub_name(format!("Sector {}", 40 + i))
                .with_nearby_locations("Close to schools, hospitals and the expressway. ".repeat(4))
                .with_top_facilities(facilities[i])
                .with_price_details(details[i])
                .with_location_advantages(landmarks[i])
        })
        .collect()
}

#[test]
fn test_recommend_excludes_self_and_is_sorted() {
    let f = facade(sample_catalog());
    for name in f.property_names() {
        for k in [1, 3, 5, 10] {
            let results = f.recommend(&name, k).unwrap();
            assert!(results.len() <= k);
            assert!(results.iter().all(|r| r.property_name != name));
            for w in results.windows(2) {
                assert!(w[0].fused_score >= w[1].fused_score);
            }
        }
    }
}

#[test]
fn test_recommend_ties_follow_catalog_order() {
    // B, C and D are indistinguishable from A's point of view
    let records = vec![
        PropertyRecord::new("A").with_top_facilities("['Gym']"),
        PropertyRecord::new("B").with_top_facilities("['Lift']"),
        PropertyRecord::new("C").with_top_facilities("['Lift']"),
        PropertyRecord::new("D").with_top_facilities("['Lift']"),
    ];
    let f = facade(records);
    let names: Vec<_> = f
        .recommend("A", 3)
        .unwrap()
        .into_iter()
        .map(|r| r.property_name)
        .collect();
    assert_eq!(names, vec!["B", "C", "D"]);
}

#[test]
fn test_identical_listing_ranks_first() {
    let f = facade(sample_catalog());
    let results = f.recommend("Property 0", 5).unwrap();
    assert_eq!(results[0].property_name, "Property 5");
    assert_eq!(results.len(), 5);
    assert!(results[0].top_facilities.len() <= 5);
    assert!(results[0].nearby_locations_excerpt.chars().count() <= 100);
}

#[test]
fn test_empty_facilities_give_zero_vector() {
    let f = facade(sample_catalog());
    let snapshot = f.snapshot();
    let index = snapshot.index_of("Property 4").unwrap();

    assert!(snapshot.spaces().facility.rows[index].is_zero());
    let sim = snapshot.engine().facility_similarity();
    for j in 0..snapshot.len() {
        if j != index {
            assert_eq!(sim.get(index, j), 0.0);
        }
    }
}

#[test]
fn test_configuration_columns_standardized() {
    let f = facade(sample_catalog());
    let matrix = &f.snapshot().spaces().configuration.matrix;
    let n = matrix.n_rows() as f64;
    for c in 0..matrix.n_cols() {
        let col = matrix.column(c);
        let mean = col.iter().sum::<f64>() / n;
        let var = col.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 1e-9, "column {} mean {}", c, mean);
        // constant columns standardize to all zeros
        assert!((var - 1.0).abs() < 1e-9 || var.abs() < 1e-12, "column {} var {}", c, var);
    }
}

#[test]
fn test_radius_monotonic() {
    let f = facade(sample_catalog());
    let radii = [1.0, 5.0, 7.0, 20.0, 50.0, 100.0];
    for landmark in f.landmarks() {
        for pair in radii.windows(2) {
            let small: Vec<_> = f
                .search_nearby(&landmark, pair[0])
                .unwrap()
                .into_iter()
                .map(|p| p.property_name)
                .collect();
            let large: Vec<_> = f
                .search_nearby(&landmark, pair[1])
                .unwrap()
                .into_iter()
                .map(|p| p.property_name)
                .collect();
            assert!(small.iter().all(|n| large.contains(n)));
        }
    }
}

#[test]
fn test_sentinel_never_reported_nearby() {
    let f = facade(sample_catalog());
    let snapshot = f.snapshot();
    let space = &snapshot.spaces().landmark;
    let index = ProximityIndex::new(space);

    for (col, landmark) in space.landmarks.iter().enumerate() {
        let hits = index.within_radius(landmark, 53_999.0).unwrap();
        for row in 0..snapshot.len() {
            if space.raw_meters.get(row, col) == SENTINEL_DISTANCE_M {
                assert!(hits.iter().all(|&(i, _)| i != row));
            }
        }
    }
}

#[test]
fn test_lakh_price_normalized_to_crore() {
    let (low, high) = try_parse_price_range("₹45 L - ₹1.2 Cr").unwrap();
    assert!((low - 0.45).abs() < 1e-9);
    assert!((high - 1.2).abs() < 1e-9);
}

#[test]
fn test_scenario_shared_facilities() {
    let records = vec![
        PropertyRecord::new("A").with_top_facilities("['Swimming Pool', 'Gym', 'Club House']"),
        PropertyRecord::new("B").with_top_facilities("['Swimming Pool', 'Gym', 'Club House']"),
        PropertyRecord::new("C").with_top_facilities("['Helipad', 'Spa']"),
    ];
    let f = facade(records);
    let all = f.recommend("A", 2).unwrap();
    assert_eq!(all[0].property_name, "B");
    assert_eq!(all[1].property_name, "C");
    assert!(all[0].fused_score > all[1].fused_score);

    let one = f.recommend("A", 1).unwrap();
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].property_name, "B");
}

#[test]
fn test_scenario_cyber_city_radius() {
    let records = vec![
        PropertyRecord::new("Near").with_location_advantages("{'Cyber City': '500 Meter'}"),
        PropertyRecord::new("Far").with_location_advantages("{'Airport': '2 Km'}"),
        PropertyRecord::new("Mid").with_location_advantages("{'Cyber City': '15 Km'}"),
        PropertyRecord::new("Remote").with_location_advantages("{'Cyber City': '60 Km'}"),
    ];
    let f = facade(records);
    let hits = f.search_nearby("Cyber City", 20.0).unwrap();
    let names: Vec<_> = hits.iter().map(|p| p.property_name.as_str()).collect();
    assert_eq!(names, vec!["Near", "Mid"]);
    assert!((hits[0].distance_km - 0.5).abs() < 1e-12);
    assert!((hits[1].distance_km - 15.0).abs() < 1e-12);
}

#[test]
fn test_unlisted_distance_not_nearby_at_any_radius() {
    let records = vec![
        PropertyRecord::new("Near").with_location_advantages("{'Cyber City': '500 Meter'}"),
        PropertyRecord::new("Unknown").with_location_advantages("{'Airport': '2 Km'}"),
        PropertyRecord::new("Remote").with_location_advantages("{'Cyber City': '60 Km'}"),
    ];
    let f = facade(records);

    let names = |radius_km: f64| -> Vec<String> {
        f.search_nearby("Cyber City", radius_km)
            .unwrap()
            .into_iter()
            .map(|p| p.property_name)
            .collect()
    };
    assert_eq!(names(60.0), vec!["Near"]);
    assert_eq!(names(100.0), vec!["Near", "Remote"]);
}

#[test]
fn test_non_finite_field_degrades_only_its_listing() {
    let details = |area: &str| {
        format!(
            "{{'2 BHK': {{'building_type': 'Apartment', 'area': '{}', 'price-range': '₹80 L - ₹1 Cr'}}}}",
            area
        )
    };
    let records = vec![
        PropertyRecord::new("A")
            .with_top_facilities("['Gym', 'Pool']")
            .with_price_details(details("1,000 sq.ft."))
            .with_location_advantages("{'Cyber City': '2 Km'}"),
        PropertyRecord::new("B")
            .with_top_facilities("['Helipad']")
            .with_price_details(details("1,000 sq.ft."))
            .with_location_advantages("{'Cyber City': '2 Km'}"),
        PropertyRecord::new("C")
            .with_top_facilities("['Gym', 'Pool']")
            .with_price_details(details("1,000 sq.ft."))
            .with_location_advantages("{'Cyber City': '2 Km'}"),
        PropertyRecord::new("D")
            .with_top_facilities("['Spa']")
            .with_price_details(details("nan sq.ft."))
            .with_location_advantages("{'Cyber City': 'NaN Km'}"),
    ];
    let f = facade(records);

    let out = f.recommend("A", 3).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.iter().all(|n| n.fused_score.is_finite()));
    assert_eq!(out[0].property_name, "C");
    assert!(out[0].fused_score > out[1].fused_score);

    // D's bad distance is unknown, not a number that lands inside a radius
    let hits = f.search_nearby("Cyber City", 100.0).unwrap();
    assert!(hits.iter().all(|p| p.property_name != "D"));
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_unknown_names_are_not_found() {
    let f = facade(sample_catalog());
    let err = f.recommend("Does Not Exist", 5).unwrap_err();
    assert!(matches!(err, Error::PropertyNotFound(_)));
    assert!(err.is_not_found());

    let err = f.search_nearby("Atlantis", 20.0).unwrap_err();
    assert!(matches!(err, Error::LandmarkNotFound(_)));
}

#[test]
fn test_end_to_end_from_csv_with_cache() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("appartments.csv");

    // 24 rows so the known malformed row 22 exists and gets dropped
    let mut rows = sample_catalog();
    for i in 7..24 {
        rows.push(
            PropertyRecord::new(format!("Property {}", i))
                .with_top_facilities("['Gym', 'Lift']")
                .with_location_advantages("{'Cyber City': '9 Km'}"),
        );
    }
    write_dataset(&dataset, &rows);

    let config = CatalogConfig::new(&dataset).with_cache_dir(dir.path().join("cache"));
    let manager = CatalogManager::open(config.clone()).unwrap();
    let names = manager.facade().property_names();
    assert_eq!(names.len(), 23);
    assert!(!names.contains(&"Property 22".to_string()));

    let fresh = manager.facade().recommend("Property 0", 5).unwrap();

    // Second open is served from the cache and answers identically
    let cached = CatalogManager::open(config).unwrap();
    let again = cached.facade().recommend("Property 0", 5).unwrap();
    assert_eq!(fresh, again);

    let nearby = cached.facade().search_nearby("Cyber City", 10.0).unwrap();
    assert!(nearby.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn test_snapshot_swap_is_atomic_for_readers() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("appartments.csv");
    write_dataset(&dataset, &sample_catalog());

    let manager =
        Arc::new(CatalogManager::open(CatalogConfig::new(&dataset).with_drop_row(None)).unwrap());
    let held = manager.facade();

    let mut bigger = sample_catalog();
    bigger.push(PropertyRecord::new("Property 99").with_top_facilities("['Gym']"));
    write_dataset(&dataset, &bigger);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let m = manager.clone();
            std::thread::spawn(move || {
                for _ in 0..20 {
                    let snapshot = m.snapshot();
                    let f = QueryFacade::new(snapshot.clone());
                    // every listed name resolves inside the same snapshot
                    for name in f.property_names() {
                        assert!(snapshot.index_of(&name).is_some());
                    }
                }
            })
        })
        .collect();

    manager.reload().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(held.property_names().len(), 7);
    assert_eq!(manager.facade().property_names().len(), 8);
    assert_eq!(manager.generation(), 1);
}
