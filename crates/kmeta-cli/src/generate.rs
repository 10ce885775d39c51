//! Run the generate command: scan headers, write the generated file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kmeta_core::Project;

pub fn run(root: &str, file: Option<&str>, output: &str) -> Result<()> {
    let root_path = Path::new(root);
    let target = file.map(PathBuf::from);

    let mut project = Project::new(root_path, target);
    project
        .scan()
        .with_context(|| format!("failed to scan headers under {root}"))?;

    println!(
        "Parsed {} translation unit(s), registered {} structure(s)",
        project.units().len(),
        project.registry().len()
    );

    let written = project
        .generate_at(&root_path.join(output))
        .context("failed to write generated file")?;

    println!("Generated: {}", written.display());
    Ok(())
}
