use std::fs;
use std::path::Path;

fn main() {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).unwrap();
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
            .unwrap();
    } else {
        // Keep the embedded dir present so the backend builds before the
        // frontend bundle exists.
        let placeholder = out_dir.join("dist");
        fs::create_dir_all(&placeholder).unwrap();
        let index = placeholder.join("index.html");
        if !index.exists() {
            fs::write(
                &index,
                "<!DOCTYPE html><html><body><p>Module Library frontend has not been built.</p></body></html>",
            )
            .unwrap();
        }
    }
    println!("cargo:rerun-if-changed=../frontend/dist");
}
