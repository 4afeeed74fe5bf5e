//! Build script for the storefront crate.
//!
//! Hashes static assets so templates can reference them with a
//! content-based cache-busting query string.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") else {
        println!("cargo:warning=CARGO_MANIFEST_DIR not set");
        println!("cargo:rustc-env=CSS_HASH=");
        println!("cargo:rustc-env=JS_HASH=");
        return;
    };
    let static_dir = Path::new(&manifest_dir).join("static");

    hash_asset(&static_dir.join("css/main.css"), "CSS_HASH");
    hash_asset(&static_dir.join("js/cart.js"), "JS_HASH");
}

/// Hash a static file and expose the first 8 hex chars as `env_name`.
fn hash_asset(path: &Path, env_name: &str) {
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            println!("cargo:rustc-env={env_name}=");
            return;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    let short_hash = digest.get(..8).unwrap_or(&digest);

    println!("cargo:rustc-env={env_name}={short_hash}");
}
