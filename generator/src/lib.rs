use std::path::PathBuf;

pub mod config;
mod error;
pub mod generator;
pub mod static_dir;
pub mod templates;

pub use config::{Config, Job};
pub use error::{Error, Result};
pub use generator::Generator;

/// Prefix for error lines printed by the binary.
pub const TOOL_NAME: &str = "sitegen";

/// Render every page listed in `<in_dir>/config.json` into `out_dir`, then
/// copy `<in_dir>/static` over it. `out_dir` must not exist yet.
pub fn build(in_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Result<()> {
    let generator = Generator::new(in_dir, out_dir)?;
    generator.build()?;
    Ok(())
}
