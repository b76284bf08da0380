use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Copies config.toml and the sample data directory from the workspace root
/// next to the binary, where the backend looks for them first.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../data");

    // OUT_DIR is typically target/<profile>/build/sales-backend-xxx/out
    let out_dir = env::var("OUT_DIR").unwrap();
    let profile = env::var("PROFILE").unwrap();
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .expect("Could not find target profile directory")
        .to_path_buf();

    let workspace_root: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("Could not find workspace root")
        .to_path_buf();

    let source_config = workspace_root.join("config.toml");
    if source_config.exists() {
        fs::copy(&source_config, target_dir.join("config.toml"))
            .unwrap_or_else(|e| panic!("Failed to copy config.toml: {}", e));
    } else {
        println!("cargo:warning=config.toml not found at {:?}, using default config", source_config);
    }

    let source_data = workspace_root.join("data");
    if source_data.is_dir() {
        let dest_data = target_dir.join("data");
        fs::create_dir_all(&dest_data).expect("Failed to create data directory");
        for entry in fs::read_dir(&source_data).expect("Failed to read data directory") {
            let path = entry.expect("Failed to read data entry").path();
            if let Some(name) = path.file_name().filter(|_| path.is_file()) {
                fs::copy(&path, dest_data.join(name))
                    .unwrap_or_else(|e| panic!("Failed to copy {:?}: {}", path, e));
            }
        }
    }
}
