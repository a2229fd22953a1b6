//! Shared fixtures for CLI tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const ENTRY: &str = "import './style.css';\n\
if (process.env.NODE_ENV !== 'production') {\n\
    // development only\n\
    console.log('debug build');\n\
}\n\
export default 'app';\n";

pub const STYLE: &str = "body {\n  margin: 0;\n}\n";

/// Browser config: replace + css always, serve outside production,
/// minify in production, sourcemaps outside production.
pub const BROWSER_CONFIG: &str = r#"
input = "src/main.js"

[output]
file = "dist/bundle.js"
format = "umd"
name = "App"
sourcemap = "!production"

[[plugins]]
name = "replace"

[[plugins]]
name = "css"

[[plugins]]
name = "minify"
when = "production"
"#;

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new(config: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join("src")).expect("create src");
        fs::write(dir.path().join("src/main.js"), ENTRY).expect("write entry");
        fs::write(dir.path().join("src/style.css"), STYLE).expect("write css");
        fs::write(dir.path().join("bale.toml"), config).expect("write config");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("read {relative}: {e}"))
    }
}
