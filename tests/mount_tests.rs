mod support;

use keystone_mount::catalog::{build_all, collect_models, default_catalog};
use keystone_mount::config::BuildConfig;
use keystone_mount::mesh::MeshEngine;
use keystone_mount::mount::latch_cutout_box;
use keystone_mount::scad::{ScadEngine, ScadNode, to_scad};
use keystone_mount::{MountBuilder, MountError, MountSpec};
use support::{approx_eq, draft_config};

fn scad_text(spec: &MountSpec) -> String {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    to_scad(&builder.assemble(spec).unwrap().solid)
}

#[test]
fn identical_inputs_render_identical_text() {
    for spec in default_catalog() {
        assert_eq!(scad_text(&spec), scad_text(&spec), "{}", spec.name());
    }
}

#[test]
fn scad_output_changes_with_the_spec() {
    let plain = scad_text(&MountSpec::new(30.0));
    let shifted = scad_text(&MountSpec::new(30.0).with_y_offset(-1.0));
    assert_ne!(plain, shifted);
}

#[test]
fn smallest_mount_builds_with_offset_and_cutout() {
    let spec = MountSpec::new(30.0).with_y_offset(-1.0).with_cutout(true);
    assert_eq!(spec.full_length(), 28.0);

    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let model = builder.assemble(&spec).unwrap();
    assert_eq!(model.name, "keystone-mount-30mm");
    assert!(matches!(model.solid.as_ref(), ScadNode::Union(parts) if parts.len() == 2));

    let text = to_scad(&model.solid);
    assert!(text.contains("polyhedron("));
    assert!(text.contains("rotate_extrude($fn = 96)"));
    assert!(text.contains("offset(r = -3)"));
}

#[test]
fn one_latch_cutout_per_slot() {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);

    for slots in [1, 2] {
        let spec = MountSpec::new(60.0).with_slot_count(slots);
        let boxes = builder.latch_cutouts(&spec).unwrap();
        assert_eq!(boxes.len(), slots);

        let latch_width = builder.metrics().latch_space_size.x;
        let space = latch_width + 18.0 * (slots - 1) as f64;
        assert!(approx_eq(boxes[0].start.x, -space / 2.0, 1e-9));
        let last = slots - 1;
        assert!(approx_eq(boxes[last].start.x, -space / 2.0 + 18.0 * last as f64, 1e-9));
        for b in &boxes {
            assert!(approx_eq(b.end.x - b.start.x, latch_width, 1e-9));
        }
    }
}

#[test]
fn latch_cutout_box_matches_builder() {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let spec = MountSpec::new(60.0).with_slot_count(2);

    let minor = builder.minor_circle_diameter(&spec);
    let width = builder.metrics().latch_space_size.x + 18.0;
    let direct = latch_cutout_box(1, width, minor, builder.metrics()).unwrap();
    assert_eq!(builder.latch_cutouts(&spec).unwrap()[1], direct);
}

#[test]
fn tolerance_shifts_the_reference_circles() {
    let config = BuildConfig::new(0.3);
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let spec = MountSpec::new(44.0);
    assert!(approx_eq(builder.minor_circle_diameter(&spec), 42.0 - 0.3, 1e-12));
    assert!(approx_eq(builder.major_circle_diameter(&spec), 44.0 - 0.3, 1e-12));
    assert!(approx_eq(builder.body_width_full(&spec), 18.3, 1e-12));
}

#[test]
fn cutout_widens_the_bore() {
    let config = draft_config();
    let engine = MeshEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);

    let plain = builder.bore_profile(&MountSpec::new(30.0)).unwrap();
    let cut = builder
        .bore_profile(&MountSpec::new(30.0).with_cutout(true))
        .unwrap();

    // plain bore: a circle 3 mm inside the 28 mm minor diameter
    let rect = plain.bounding_rect().unwrap();
    assert!(approx_eq(rect.width(), 22.0, 0.1));
    assert!(approx_eq(rect.height(), 22.0, 0.1));

    let cut_rect = cut.bounding_rect().unwrap();
    assert!(cut_rect.width() > rect.width() + 1.0);
    assert!(cut_rect.height() > rect.height() + 1.0);
    assert_ne!(cut.point_count(), plain.point_count());
    assert!(cut.area() > plain.area());
}

#[test]
fn too_many_slots_are_rejected_before_building() {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let err = builder
        .build_main(&MountSpec::new(30.0).with_slot_count(3))
        .unwrap_err();
    assert!(matches!(err, MountError::InvalidParameter { .. }));
}

#[test]
fn batch_keeps_going_past_a_failure() {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let specs = [
        MountSpec::new(44.0),
        MountSpec::new(1.0),
        MountSpec::new(50.0),
    ];
    let reports = build_all(&builder, &specs);
    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_ok());
    assert!(!reports[1].is_ok());
    assert!(reports[2].is_ok());
    assert_eq!(reports[2].name(), "keystone-mount-50mm");
}

#[test]
fn colliding_names_keep_the_last_build() {
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let specs = [
        MountSpec::new(30.0),
        MountSpec::new(30.0).with_y_offset(-1.0).with_cutout(true),
    ];
    let later = builder.assemble(&specs[1]).unwrap();
    let reports = build_all(&builder, &specs);
    let models = collect_models(reports.into_iter().filter_map(|r| r.result.ok()));
    assert_eq!(models.len(), 1);
    assert_eq!(to_scad(&models[0].solid), to_scad(&later.solid));
}
