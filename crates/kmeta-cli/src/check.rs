//! Run the check command: parse headers and report diagnostics.
//!
//! Diagnostics are informational; check always exits zero when the scan
//! itself completes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use kmeta_core::Project;

pub fn run(root: &str, file: Option<&str>) -> Result<()> {
    let mut project = Project::new(root, file.map(PathBuf::from));
    project
        .scan()
        .with_context(|| format!("failed to scan headers under {root}"))?;

    let mut count = 0;
    for (path, diagnostic) in project.diagnostics() {
        println!(
            "{}:{}: {}: {}",
            path.display(),
            diagnostic.line,
            diagnostic.severity,
            diagnostic.message
        );
        count += 1;
    }

    if count == 0 {
        println!(
            "No diagnostics in {} translation unit(s)",
            project.units().len()
        );
    } else {
        println!("{count} diagnostic(s) reported (informational)");
    }
    Ok(())
}
