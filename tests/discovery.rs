mod common;

use common::source_tree;
use ferrous_ioc::catalog::discovery::source_names;
use ferrous_ioc::{Catalog, Container, ContainerConfig, DiError, Resolver, SourceLayout, TypeDescriptor, TypeSystem};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_names_follow_the_directory_layout() {
    let (_dir, root) = source_tree(&["app::engine", "app::parts::mod", "app::parts::valve", "main"]);
    fs::write(root.join("app/README.md"), "ignored").unwrap();

    let names = source_names(&root, &SourceLayout::default()).unwrap();
    assert_eq!(names, vec!["app::engine", "app::parts", "app::parts::valve", "main"]);
}

#[test]
fn test_custom_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("lib");
    fs::create_dir_all(root.join("net")).unwrap();
    fs::write(root.join("net/socket.mod"), "").unwrap();
    fs::write(root.join("net/socket.rs"), "").unwrap();

    let layout = SourceLayout {
        source_root: PathBuf::from("lib"),
        extension: "mod".to_string(),
        namespace_separator: ".".to_string(),
    };
    assert_eq!(source_names(&root, &layout).unwrap(), vec!["net.socket"]);
}

#[derive(Default)]
struct Wheel;

#[derive(Default)]
struct Axle;

#[test]
fn test_duplicate_modules_keep_first_position() {
    let types = TypeSystem::new()
        .with(TypeDescriptor::managed::<Wheel>("car").default_constructor().build())
        .with(TypeDescriptor::managed::<Axle>("car::axle").default_constructor().build());

    // `car.rs` and `car/mod.rs` both map to `car`.
    let catalog = Catalog::from_names(&types, ["car", "car::axle", "car"]).unwrap();
    let names: Vec<_> = catalog.iter().map(|d| d.name()).collect();
    assert_eq!(names.len(), 2);
    assert!(names[0].ends_with("Wheel"));
    assert!(names[1].ends_with("Axle"));
}

#[test]
fn test_unknown_module_is_discovery_error() {
    let (_dir, root) = source_tree(&["car", "lib"]);
    let types = TypeSystem::new().with(TypeDescriptor::managed::<Wheel>("car").default_constructor().build());

    match Container::new(types).start(&root) {
        Err(DiError::Discovery(message)) => assert!(message.contains("lib")),
        other => panic!("expected discovery error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_container_uses_configured_layout() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("sources");
    fs::create_dir_all(root.join("car")).unwrap();
    fs::write(root.join("car/wheel.unit"), "").unwrap();

    let types = TypeSystem::new().with(TypeDescriptor::managed::<Wheel>("car/wheel").default_constructor().build());
    let config = ContainerConfig::default().with_layout(SourceLayout {
        source_root: PathBuf::from("sources"),
        extension: "unit".to_string(),
        namespace_separator: "/".to_string(),
    });

    let handle = Container::new(types).with_config(config).start(&root).unwrap();
    assert!(handle.resolve::<Wheel>().is_ok());
}

#[test]
fn test_invalid_config_fails_start() {
    let (_dir, root) = source_tree(&[]);
    let container = Container::new(TypeSystem::new()).with_config(ContainerConfig::default().with_init_hook(""));
    assert!(matches!(container.start(&root), Err(DiError::Consistency(_))));
}
