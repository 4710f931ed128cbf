//! Build script for storefront crate.
//!
//! Generates content-based hashes for static assets so templates can emit
//! immutable, cache-busted URLs.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    hash_asset("static/css/main.css", "css", "CSS_HASH");
    hash_asset("static/js/app.js", "js", "JS_HASH");
}

/// Hash an asset and copy it to a derived directory with the hash in the
/// filename.
///
/// Sets `env_var` for use with `env!(...)` in asset-URL template filters.
fn hash_asset(relative: &str, ext: &str, env_var: &str) {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let asset_path = Path::new(&manifest_dir).join(relative);

    // Tell Cargo to rerun if the asset changes
    println!("cargo:rerun-if-changed={}", asset_path.display());

    let content = match fs::read(&asset_path) {
        Ok(content) => content,
        Err(e) => {
            // Asset might not exist yet during initial build
            println!("cargo:warning=Could not read {relative}: {e}");
            println!("cargo:rustc-env={env_var}=");
            return;
        }
    };

    // First 8 chars of SHA256 are enough to bust caches
    let mut hasher = Sha256::new();
    hasher.update(&content);
    let hash = format!("{:x}", hasher.finalize());
    let short_hash = &hash[..8];

    println!("cargo:rustc-env={env_var}={short_hash}");

    let derived_dir = Path::new(&manifest_dir).join(format!("static/{ext}/derived"));
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");

    let stem = asset_path
        .file_stem()
        .and_then(|s| s.to_str())
        .expect("asset filename must be valid UTF-8");
    let derived_path = derived_dir.join(format!("{stem}.{short_hash}.{ext}"));
    fs::copy(&asset_path, &derived_path).expect("Failed to copy asset to derived directory");

    println!("cargo:warning={relative} hash: {short_hash}");
}
