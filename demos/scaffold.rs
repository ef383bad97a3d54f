use fsedit_kit::{DirFS, DirOptions, FileEditor, MatchTarget};

fn main() -> fsedit_kit::Result<()> {
    let root = std::env::temp_dir().join("fsedit_scaffold");
    println!("Scaffolding into: {}", root.display());

    // `/` below is `root` on the host
    let mut editor = FileEditor::new(DirFS::new(&root)?);
    editor.delete_path("/demo")?;

    editor.create_dir("/demo/src", DirOptions::recursive())?;
    editor.write_str(
        "/demo/Cargo.toml",
        "[package]\nname = \"{NAME}\"\nversion = \"0.1.0\"\n",
    )?;
    editor.write_str("/demo/src/lib.rs", "mod config;\n")?;
    editor.write_str("/demo/.env", "NAME=demo\n")?;

    // `{NAME}` is filled in every file except `.env`
    let vars = editor.load_env("/demo/.env")?;
    editor.replace_placeholders("/demo", &vars)?;

    // new modules go right after the existing one
    editor.insert_after(
        "/demo/src/lib.rs",
        "mod routes;\n",
        &MatchTarget::from("mod config;\n"),
    )?;
    editor.prepend("/demo/src/lib.rs", "//! Generated.\n\n", None)?;
    editor.append("/demo/src/lib.rs", "\npub use config::*;\n")?;

    for name in editor.list_files("/demo/src")? {
        let path = format!("/demo/src/{}", name);
        println!("--- {} ({} bytes)", path, editor.file_size(&path)?);
        print!("{}", editor.read_to_string(&path)?);
    }

    // a missing target is reported and the file is left alone
    let missing = MatchTarget::from("mod missing;");
    if let Err(e) = editor.insert_before("/demo/src/lib.rs", "mod x;\n", &missing) {
        println!("--- expected failure: {}", e);
    }

    editor.delete_path("/demo")?;
    Ok(())
}
