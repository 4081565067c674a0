//! On-disk format round-trips: PGM in, GDSII in/out, JSON report out.

use maskcheck::convert::{
    polygons_from_image, read_gdsii, read_pgm, write_gdsii, write_pgm, Image,
};
use maskcheck::report::Report;
use maskcheck::{run, Config};

/// Paint a filled rectangle of mask pixels.
fn paint(image: &mut Image, x0: usize, y0: usize, width: usize, height: usize) {
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            image.set(x, y, 255);
        }
    }
}

#[test]
fn pgm_file_round_trip_preserves_polygons() {
    let mut image = Image::new(40, 20);
    paint(&mut image, 2, 2, 10, 10);
    paint(&mut image, 25, 2, 10, 10);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.pgm");
    write_pgm(&path, &image).unwrap();
    let reloaded = read_pgm(&path).unwrap();

    let direct = polygons_from_image(&image);
    let from_file = polygons_from_image(&reloaded);

    assert_eq!(direct.len(), 2);
    assert_eq!(direct.len(), from_file.len());
    for (a, b) in direct.iter().zip(&from_file) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.vertices, b.vertices);
    }
}

#[test]
fn gdsii_detour_matches_direct_conversion() {
    // PGM -> polygons and PGM -> polygons -> GDSII -> polygons must
    // agree vertex for vertex.
    let mut image = Image::new(40, 20);
    paint(&mut image, 1, 1, 12, 12);
    paint(&mut image, 20, 1, 6, 3);

    let direct = polygons_from_image(&image);
    assert_eq!(direct.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.gds");
    write_gdsii(&direct, &path).unwrap();
    let via_gdsii = read_gdsii(&path).unwrap();

    assert_eq!(direct.len(), via_gdsii.len());
    for (a, b) in direct.iter().zip(&via_gdsii) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.segments.len(), b.segments.len());
    }
}

#[test]
fn traced_squares_flow_through_the_checker() {
    // Two 10x10 squares with a gap of 2, as an image.
    let mut image = Image::new(30, 14);
    paint(&mut image, 0, 0, 10, 10);
    paint(&mut image, 12, 0, 10, 10);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mask.pgm");
    write_pgm(&path, &image).unwrap();

    let polygons = polygons_from_image(&read_pgm(&path).unwrap());
    assert_eq!(polygons.len(), 2);

    let results = run(&polygons, &Config::default().with_rule_distance(5.0)).unwrap();
    assert!(results.total_space_violations() >= 1);
}

#[test]
fn report_written_to_disk_has_the_stable_schema() {
    let mut image = Image::new(30, 14);
    paint(&mut image, 0, 0, 10, 10);
    paint(&mut image, 12, 0, 10, 10);
    let polygons = polygons_from_image(&image);

    let results = run(&polygons, &Config::default().with_rule_distance(5.0)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("violations.json");
    Report::new(&results, 3).write_to(&path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(value["execution_time_ms"], 3);
    assert!(value["space_violations"]["type_a"].is_array());
    assert!(value["space_violations"]["type_b"].is_array());
    assert!(value["width_violations"].is_array());
    let summary = &value["summary"];
    assert_eq!(
        summary["total_violations"],
        serde_json::json!(results.total_violations())
    );
    assert_eq!(
        summary["total_space_violations"].as_u64().unwrap()
            + summary["total_width_violations"].as_u64().unwrap(),
        summary["total_violations"].as_u64().unwrap()
    );

    // Each type-a record carries the full field set.
    if let Some(first) = value["space_violations"]["type_a"].get(0) {
        assert!(first["point1"].is_array());
        assert!(first["point2"].is_array());
        assert!(first["distance"].is_number());
        assert!(first["polygon_id_1"].is_number());
        assert!(first["polygon_id_2"].is_number());
    }
}

#[test]
fn rule_file_drives_a_full_run() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.txt");
    std::fs::write(
        &rules,
        "# thin-feature rules\nrule_distance: 10\nsampling_multiplier: 4.0\nthreads: auto\nspace_check: false\nwidth_check: true\nparallel: false\n",
    )
    .unwrap();

    let config = Config::from_rule_file(&rules).unwrap();
    assert_eq!(config.rule_distance, 10.0);
    assert!(!config.space_check);

    let mut image = Image::new(110, 10);
    paint(&mut image, 1, 1, 100, 3);
    let polygons = polygons_from_image(&image);
    assert_eq!(polygons.len(), 1);

    let results = run(&polygons, &config).unwrap();
    assert!(results.space_violations_type_a.is_empty());
    assert!(results.space_violations_type_b.is_empty());
    assert!(!results.width_violations.is_empty());
    assert!((results.width_violations[0].distance - 3.0).abs() < 1e-9);
}
