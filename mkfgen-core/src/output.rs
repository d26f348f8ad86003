//! Manifest rendering: the fixed `.mkf` text format plus a JSON view.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::manifest::Manifest;

/// Render the five-block text format in fixed order.
///
/// Blocks with no entries are omitted entirely. The format is stable:
/// re-rendering an unchanged manifest produces byte-identical output.
pub fn write_text(manifest: &Manifest, mut w: impl Write) -> Result<()> {
    let config = manifest.config();

    write_block(&mut w, "defines", config.defines())?;
    write_block(&mut w, "includepaths", config.includepaths())?;
    write_block(&mut w, "options", config.options())?;

    let rendered: Vec<String> = manifest.files().iter().map(|e| e.to_string()).collect();
    write_block(&mut w, "files", &rendered)?;

    write_block(&mut w, "subprojects", config.subprojects())?;
    Ok(())
}

/// Write the manifest as prettified JSON.
pub fn write_json_pretty(manifest: &Manifest, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    w.write_all(json.as_bytes())?;
    Ok(())
}

/// Serialize into `<out_dir>/<output_name>`, replacing any previous file.
pub fn write_to_dir(manifest: &Manifest, out_dir: &Path) -> Result<PathBuf> {
    let dest = out_dir.join(manifest.config().output_name());

    let mut buf = Vec::new();
    write_text(manifest, &mut buf)?;
    fs::write(&dest, buf).with_context(|| format!("writing {}", dest.display()))?;

    Ok(dest)
}

fn write_block(w: &mut impl Write, name: &str, entries: &[String]) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }

    writeln!(w, "{name}")?;
    writeln!(w, "{{")?;
    for entry in entries {
        writeln!(w, "    {entry}")?;
    }
    writeln!(w, "}}")?;
    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, ManifestConfig};
    use std::fs;
    use tempfile::tempdir;

    fn manifest_for(dir: &Path, name: &str) -> Manifest {
        let config = ManifestConfig::new(dir, name).expect("config");
        Manifest::collect(config).expect("collect")
    }

    #[test]
    fn single_includepath_renders_exact_block() {
        let tmp = tempdir().expect("tempdir");
        let config = ManifestConfig::new(tmp.path(), "x.mkf")
            .expect("config")
            .with_includepaths(vec!["./inc".into()]);
        let manifest = Manifest::collect(config).expect("collect");

        let mut buf = Vec::new();
        write_text(&manifest, &mut buf).expect("render");

        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "includepaths\n{\n    ./inc\n}\n\n");
    }

    #[test]
    fn empty_lists_produce_no_blocks() {
        let tmp = tempdir().expect("tempdir");
        let manifest = manifest_for(tmp.path(), "x.mkf");

        let mut buf = Vec::new();
        write_text(&manifest, &mut buf).expect("render");

        assert!(buf.is_empty(), "empty manifest should render nothing");
    }

    #[test]
    fn blocks_appear_in_fixed_order() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("a.cpp"), b"").expect("touch");
        let config = ManifestConfig::new(tmp.path(), "x.mkf")
            .expect("config")
            .with_defines(vec!["NDEBUG".into()])
            .with_includepaths(vec!["./inc".into()])
            .with_options(vec!["-O2".into()])
            .with_subprojects(vec!["util".into()]);
        let manifest = Manifest::collect(config).expect("collect");

        let mut buf = Vec::new();
        write_text(&manifest, &mut buf).expect("render");
        let text = String::from_utf8(buf).expect("utf8");

        let positions: Vec<usize> = ["defines", "includepaths", "options", "files", "subprojects"]
            .iter()
            .map(|name| text.find(&format!("{name}\n{{")).expect("block present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn write_to_dir_overwrites_previous_manifest() {
        let src = tempdir().expect("src");
        let out = tempdir().expect("out");
        fs::write(out.path().join("x.mkf"), b"stale contents").expect("stale");

        let config = ManifestConfig::new(src.path(), "x.mkf")
            .expect("config")
            .with_includepaths(vec!["./inc".into()]);
        let manifest = Manifest::collect(config).expect("collect");

        let dest = write_to_dir(&manifest, out.path()).expect("write");
        let text = fs::read_to_string(&dest).expect("read back");

        assert_eq!(text, "includepaths\n{\n    ./inc\n}\n\n");
    }

    #[test]
    fn json_rendering_uses_marker_strings() {
        let tmp = tempdir().expect("tempdir");
        fs::create_dir(tmp.path().join("sub")).expect("mkdir");
        let manifest = manifest_for(tmp.path(), "x.mkf");

        let mut buf = Vec::new();
        write_json_pretty(&manifest, &mut buf).expect("render");

        let parsed: serde_json::Value = serde_json::from_slice(&buf).expect("parse");
        let files = parsed["files"].as_array().expect("files array");
        let rendered: Vec<&str> = files.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(rendered, ["[sub]", "(sub)"]);
    }
}
