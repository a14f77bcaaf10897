//! `versionator builds` – list registered engine builds.

use anyhow::Result;
use versionator_core::registry::BuildRegistry;

pub fn run_builds() -> Result<()> {
    let registry = BuildRegistry::load_from_path(&BuildRegistry::default_path()?)?;
    if registry.builds.is_empty() {
        println!("No builds registered.");
    } else {
        println!("{:<20} {:<8} {}", "ASSOCIATION", "PRESENT", "PATH");
        for (association, path) in &registry.builds {
            let present = if path.is_dir() { "yes" } else { "no" };
            println!("{:<20} {:<8} {}", association, present, path.display());
        }
    }
    Ok(())
}
