pub mod apply;
pub mod init;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use roster_core::model::Script;
use roster_core::parser;

/// Load one script file, or every script under a directory.
fn load_scripts(path: &Path) -> Result<Vec<Script>> {
    if path.is_dir() {
        parser::load_script_directory(path)
    } else {
        Ok(vec![parser::parse_script(path)?])
    }
}
