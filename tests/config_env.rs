/// Environment-driven configuration; serialized because the process
/// environment is shared between tests.

use ferrous_ioc::{ContainerConfig, DiError};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const VARS: [&str; 4] = [
    "FERROUS_IOC_SOURCE_ROOT",
    "FERROUS_IOC_EXTENSION",
    "FERROUS_IOC_NAMESPACE_SEPARATOR",
    "FERROUS_IOC_INIT_HOOK",
];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear();
    let config = ContainerConfig::from_env().unwrap();
    assert_eq!(config, ContainerConfig::default());
    assert_eq!(config.init_hook, "init");
    assert_eq!(config.layout.source_root, PathBuf::from("src"));
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear();
    env::set_var("FERROUS_IOC_SOURCE_ROOT", "lib");
    env::set_var("FERROUS_IOC_EXTENSION", ".inc");
    env::set_var("FERROUS_IOC_NAMESPACE_SEPARATOR", ".");
    env::set_var("FERROUS_IOC_INIT_HOOK", "post_construct");

    let config = ContainerConfig::from_env().unwrap();
    clear();

    assert_eq!(config.layout.source_root, PathBuf::from("lib"));
    assert_eq!(config.layout.extension, "inc");
    assert_eq!(config.layout.namespace_separator, ".");
    assert_eq!(config.init_hook, "post_construct");
}

#[test]
#[serial]
fn test_empty_hook_is_rejected() {
    clear();
    env::set_var("FERROUS_IOC_INIT_HOOK", "");
    let result = ContainerConfig::from_env();
    clear();
    assert!(matches!(result, Err(DiError::Consistency(_))));
}
