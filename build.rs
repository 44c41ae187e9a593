// build.rs
use std::process::Command;

fn main() {
    // Revision of the generator itself, logged on startup.
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    let revision = match output {
        Ok(output) if output.status.success() => String::from_utf8(output.stdout)
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        // not a checkout, or no git on PATH
        _ => "unknown".to_string(),
    };

    println!("cargo:rustc-env=NCL_BUILDINFO_REVISION={}", revision);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
