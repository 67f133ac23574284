//! Doctor command - check that the artifacts load

use anyhow::Result;

use crate::inference::{ArtifactKind, ArtifactPaths, InferenceService};

pub fn run(paths: &ArtifactPaths) -> Result<()> {
    println!("🩺 Attrition Doctor\n");

    match InferenceService::load(paths) {
        Ok(_) => {
            println!("✓ Model: {}", paths.model.display());
            println!("✓ Imputer: {}", paths.imputer.display());
            println!("\n✅ All checks passed!");
            Ok(())
        }
        Err(e) => {
            match e.kind() {
                ArtifactKind::Model => {
                    println!("✗ Model: {}", paths.model.display());
                    println!("○ Imputer: not checked");
                }
                ArtifactKind::Imputer => {
                    println!("✓ Model: {}", paths.model.display());
                    println!("✗ Imputer: {}", paths.imputer.display());
                }
            }
            println!("  {e}");
            Err(e.into())
        }
    }
}
