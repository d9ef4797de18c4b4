#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use ferrous_ioc::{BuildObserver, DiError, Key, Lifetime};
use tempfile::TempDir;

/// Creates `src/<module path>.rs` for each module name and returns the
/// directory guard with the `src` root.
pub fn source_tree(modules: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("src");
    fs::create_dir_all(&root).expect("source root");
    for module in modules {
        let path = root.join(format!("{}.rs", module.replace("::", "/")));
        fs::create_dir_all(path.parent().expect("parent")).expect("module dir");
        fs::write(path, "").expect("module file");
    }
    (dir, root)
}

/// Records build events as readable strings.
#[derive(Default)]
pub struct Recorder {
    pub events: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Short names of initialized types, in order.
    pub fn initialized(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("init ").map(str::to_string))
            .collect()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn short(key: &Key) -> &'static str {
    let name = key.display_name();
    name.rsplit("::").next().unwrap_or(name)
}

impl BuildObserver for Recorder {
    fn instantiated(&self, key: &Key, lifetime: Lifetime) {
        self.push(format!("new {} {}", short(key), lifetime));
    }

    fn injected(&self, owner: &Key, field: &str, provider: &Key) {
        self.push(format!("set {}.{} <- {}", short(owner), field, short(provider)));
    }

    fn initialized(&self, key: &Key, _duration: Duration) {
        self.push(format!("init {}", short(key)));
    }

    fn failed(&self, error: &DiError) {
        self.push(format!("failed {}", error));
    }
}
