//! Build script for the admin crate.
//!
//! Embeds the git commit and build time so `GET /status` can report which
//! build is running.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-env-changed=MAISON_GIT_COMMIT");

    // CI images build without a .git directory and pass the commit in
    let commit = std::env::var("MAISON_GIT_COMMIT")
        .ok()
        .or_else(git_commit)
        .unwrap_or_default();
    println!("cargo:rustc-env=MAISON_GIT_COMMIT={commit}");

    let built_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    println!("cargo:rustc-env=MAISON_BUILT_AT={built_at}");
}

fn git_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let commit = String::from_utf8(output.stdout).ok()?;
    Some(commit.trim().to_owned())
}
