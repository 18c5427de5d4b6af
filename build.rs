use std::fs;
use std::path::Path;

// Askama reads templates at compile time; without explicit cargo hints a
// template edit does not trigger a rebuild.
fn main() {
    let dir = Path::new("templates");
    if !dir.exists() {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let p = entry.path();
        if p.extension().and_then(|s| s.to_str()) == Some("html") {
            println!("cargo:rerun-if-changed={}", p.display());
        }
    }
}
