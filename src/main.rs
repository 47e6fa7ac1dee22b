/// Native entry point: load images into an editor grid and print what would be submitted.
///
/// Usage: `folio-native [--save-config] [--project record.json] [image ...]`
///
/// `--save-config` writes the active configuration (defaults if none was
/// found) to the config directory so it can be edited.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use folio::crop::CropRequest;
    use folio::submission::ProjectRecord;
    use folio::{AssetEditor, EditorConfig};

    let config = EditorConfig::load_from_default_path().unwrap_or_default();
    folio::logging::init(config.log_level);

    let mut args = std::env::args().skip(1).peekable();
    let mut editor = AssetEditor::new(&config);

    if args.peek().map(String::as_str) == Some("--save-config") {
        args.next();
        match config.save_to_default_path() {
            Ok(path) => println!("Configuration written to {}", path.display()),
            Err(e) => {
                eprintln!("Failed to save configuration: {}", e);
                std::process::exit(1);
            }
        }
    }

    if args.peek().map(String::as_str) == Some("--project") {
        args.next();
        let Some(path) = args.next() else {
            eprintln!("--project needs a path");
            std::process::exit(2);
        };
        let record = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                serde_json::from_str::<ProjectRecord>(&json).map_err(|e| e.to_string())
            });
        match record {
            Ok(record) => editor.load_project(record),
            Err(e) => {
                eprintln!("Failed to load record {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    for path in args {
        if !folio::loader::is_image_file(&path) {
            log::warn!("Skipping {}: not an image file", path);
            continue;
        }
        if let Err(e) = editor.pick_path(std::path::Path::new(&path)) {
            eprintln!("{}: {}", path, e);
        }
    }

    // Accept every picked image with the default crop box
    while let Some(slot) = editor.next_crop() {
        if let Err(e) = editor.apply_crop(slot, &CropRequest::default()) {
            eprintln!("Crop failed for slot {}: {}", slot, e);
            editor.skip_crop(slot);
        }
    }

    let submission = editor.submission();
    for part in &submission.uploads {
        println!(
            "{} #{}: {} ({}, {} bytes)",
            part.field,
            part.order,
            part.file.name,
            part.file.mime,
            part.file.len()
        );
    }
    match submission.changes_json() {
        Ok(json) if !submission.changes.is_empty() => println!("{}", json),
        Ok(_) => {}
        Err(e) => eprintln!("Failed to serialize asset changes: {}", e),
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
