mod support;

use keystone_mount::catalog::Catalog;
use keystone_mount::config::BuildConfig;
use keystone_mount::io::stl::StlFile;
use keystone_mount::io::{IoError, ModelFile};
use keystone_mount::mesh::{Mesh, MeshEngine};
use keystone_mount::scad::{ScadEngine, ScadFile};
use keystone_mount::{MountBuilder, MountSpec};
use nalgebra::Vector3;
use support::draft_config;

#[test]
fn stl_file_is_named_after_the_mount() {
    let dir = tempfile::tempdir().unwrap();
    let config = draft_config();
    let engine = MeshEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let nut = builder.build_nut(&MountSpec::new(40.0)).unwrap();

    let path = StlFile {
        mesh: &nut,
        ascii: false,
    }
    .write_to(dir.path(), "nut-40")
    .unwrap();
    assert_eq!(path, dir.path().join("nut-40.stl"));

    let mut file = std::fs::File::open(&path).unwrap();
    let indexed = stl_io::read_stl(&mut file).unwrap();
    assert!(!indexed.faces.is_empty());
}

#[test]
fn scad_file_is_written_into_a_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("models");
    let config = BuildConfig::default();
    let engine = ScadEngine::new(config.resolution);
    let builder = MountBuilder::new(&engine, &config);
    let model = builder.assemble(&MountSpec::new(60.0).with_slot_count(2)).unwrap();

    let path = ScadFile { root: &model.solid }
        .write_to(&out, &model.name)
        .unwrap();
    assert_eq!(path, out.join("keystone-mount-60mm-2slots.scad"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("// keystone-mount-60mm-2slots\nunion() {\n"));
}

#[test]
fn rewriting_a_name_replaces_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let small = Mesh::cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
    let large = Mesh::cuboid(Vector3::new(2.0, 2.0, 2.0)).unwrap();

    for mesh in [&small, &large] {
        StlFile { mesh, ascii: true }.write_to(dir.path(), "box").unwrap();
    }
    let text = std::fs::read_to_string(dir.path().join("box.stl")).unwrap();
    assert!(text.contains("vertex 2.000000 2.000000 2.000000"));
}

#[test]
fn path_separators_are_not_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let cube = Mesh::cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
    let file = StlFile {
        mesh: &cube,
        ascii: false,
    };
    assert!(matches!(
        file.write_to(dir.path(), "../escape"),
        Err(IoError::MalformedPath(_))
    ));
}

#[test]
fn catalog_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mounts.toml");
    std::fs::write(
        &path,
        "tolerance = 0.25\n\n[[mount]]\nouter_diameter = 50.0\n",
    )
    .unwrap();

    let catalog = Catalog::load(&path).unwrap();
    assert_eq!(catalog.tolerance, 0.25);
    assert_eq!(catalog.mounts, vec![MountSpec::new(50.0)]);
    assert!(Catalog::load(&dir.path().join("missing.toml")).is_err());
}
