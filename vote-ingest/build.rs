fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let git_hash = std::process::Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());

    if let Some(hash) = git_hash {
        println!("cargo:rustc-env=VOTE_INGEST_BUILD_GIT_HASH={}", hash);
    }
}
