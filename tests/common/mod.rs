//! Shared test utilities for integration tests.
//!
//! Import from integration test files as:
//! ```ignore
//! mod common;
//! ```

use std::path::PathBuf;
use tempfile::TempDir;

/// Initialize tracing for tests, respecting RUST_LOG env var.
///
/// Safe to call multiple times. Later calls are no-ops.
#[allow(dead_code)]
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A small shapes library:
///
/// - `Acme.Shape` documents itself, `Area` and `Describe`.
/// - `Acme.IDrawable` documents `Draw`.
/// - `Acme.Circle` derives from `Acme.Shape`, implements `Acme.IDrawable`, and inherits all of
///   its documentation.
/// - `Acme.Unit` derives from `Acme.Circle` and inherits again.
#[allow(dead_code)]
pub const SHAPES_CATALOG: &str = r#"
[resolver]
max_depth = 16

[[types]]
name = "Acme.Shape"
doc = "Base of all shapes. See <see cref=\"T:Acme.IDrawable\"/>."

[[types.members]]
name = "Area"
kind = "property"
doc = "Area enclosed by the [shape](cref:T:Acme.Shape)."

[[types.members]]
name = "Describe"
kind = "method"
doc = "Human readable summary, for <see cref=\"P:Acme.Shape.Area\">area</see> reporting."

[[types]]
name = "Acme.IDrawable"
doc = "Something that can be drawn."

[[types.members]]
name = "Draw"
kind = "method"
doc = "Draws to the current surface."

[[types]]
name = "Acme.Circle"
base = "Acme.Shape"
interfaces = ["Acme.IDrawable"]
doc = "<inheritdoc/>"

[[types.members]]
name = "Area"
kind = "property"
doc = "<inheritdoc/>"

[[types.members]]
name = "Draw"
kind = "method"
doc = "<inheritdoc/>"

[[types]]
name = "Acme.Unit"
base = "Acme.Circle"
doc = "The unit circle."

[[types.members]]
name = "Area"
kind = "property"
doc = "<inheritdoc/>"
"#;

/// Write `content` as `name` inside `temp_dir` and return its path.
#[allow(dead_code)]
pub fn write_catalog(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
