//! Protobuf binding regeneration: schema discovery, compiler invocation,
//! and C++ output renaming.

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use walkdir::WalkDir;

/// Output language for the protobuf compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoLang {
    Java,
    Cpp,
}

impl ProtoLang {
    fn out_flag(self) -> &'static str {
        match self {
            ProtoLang::Java => "--java_out",
            ProtoLang::Cpp => "--cpp_out",
        }
    }
}

/// One compiler invocation setup, fixed at construction time.
#[derive(Debug, Clone)]
pub struct ProtocJob {
    compiler: PathBuf,
    include_path: PathBuf,
    lang: ProtoLang,
    out_dir: PathBuf,
}

impl ProtocJob {
    /// Build a job using `$PROTOC` when set, plain `protoc` otherwise.
    pub fn new(lang: ProtoLang, include_path: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        let compiler = env::var_os("PROTOC")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("protoc"));

        Self {
            compiler,
            include_path: include_path.into(),
            lang,
            out_dir: out_dir.into(),
        }
    }

    /// Override the compiler binary.
    pub fn with_compiler(mut self, compiler: impl Into<PathBuf>) -> Self {
        self.compiler = compiler.into();
        self
    }

    /// Regenerate bindings for one schema file.
    ///
    /// Returns the renamed C++ outputs; Java runs return an empty list since
    /// javac-friendly names need no fixing.
    pub fn run(&self, schema: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.compiler)
            .arg(format!("--proto_path={}", self.include_path.display()))
            .arg(format!("{}={}", self.lang.out_flag(), self.out_dir.display()))
            .arg(schema)
            .output()
            .with_context(|| format!("running {}", self.compiler.display()))?;

        if !output.status.success() {
            return Err(anyhow!(
                "{} failed for {}: {}",
                self.compiler.display(),
                schema.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        match self.lang {
            ProtoLang::Cpp => rename_cpp_outputs(&self.out_dir),
            ProtoLang::Java => Ok(Vec::new()),
        }
    }
}

/// Recursively collect `.proto` schema files under `root`.
pub fn find_schemas(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(anyhow!("schema path does not exist: {}", root.display()));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() && is_schema(entry.path()) {
            found.push(entry.path().to_path_buf());
        }
    }

    Ok(found)
}

fn is_schema(path: &Path) -> bool {
    path.extension().and_then(OsStr::to_str) == Some("proto")
}

/// Rename every `<stem>.pb.cc` in `dir` to `<stem>.pb.cpp`.
///
/// A stale `<stem>.pb.cpp` from a previous run is removed first; its absence
/// is the one failure that is tolerated. Returns the renamed paths.
pub fn rename_cpp_outputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut renamed = Vec::new();

    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();

        let stem = match path.file_name().and_then(OsStr::to_str) {
            Some(name) => match name.strip_suffix(".pb.cc") {
                Some(stem) => stem.to_string(),
                None => continue,
            },
            None => continue,
        };

        let dest = dir.join(format!("{stem}.pb.cpp"));
        match fs::remove_file(&dest) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("removing {}", dest.display()));
            }
        }

        fs::rename(&path, &dest)
            .with_context(|| format!("renaming {} to {}", path.display(), dest.display()))?;
        renamed.push(dest);
    }

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::{find_schemas, is_schema, rename_cpp_outputs};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn recognises_schema_extension() {
        assert!(is_schema("/a/b/msg.proto".as_ref()));
        assert!(!is_schema("/a/b/msg.proto.bak".as_ref()));
        assert!(!is_schema("/a/b/msg".as_ref()));
    }

    #[test]
    fn discovers_nested_schemas() {
        let tmp = tempdir().expect("tempdir");
        let nested = tmp.path().join("a/b");
        fs::create_dir_all(&nested).expect("mkdir");
        let schema = nested.join("msg.proto");
        fs::write(&schema, b"syntax = \"proto3\";\n").expect("touch schema");
        fs::write(tmp.path().join("notes.txt"), b"").expect("touch other");

        let found = find_schemas(tmp.path()).expect("find");

        assert_eq!(found, vec![schema]);
    }

    #[test]
    fn missing_schema_root_is_an_error() {
        let missing = PathBuf::from("/nonexistent/mkfgen-protos");
        assert!(find_schemas(&missing).is_err());
    }

    #[test]
    fn renames_compiler_output_extension() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("msg.pb.cc"), b"// generated").expect("touch");

        let renamed = rename_cpp_outputs(tmp.path()).expect("rename");

        assert_eq!(renamed, vec![tmp.path().join("msg.pb.cpp")]);
        assert!(!tmp.path().join("msg.pb.cc").exists());
        assert!(tmp.path().join("msg.pb.cpp").exists());
    }

    #[test]
    fn rename_replaces_stale_previous_output() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("msg.pb.cc"), b"// fresh").expect("touch fresh");
        fs::write(tmp.path().join("msg.pb.cpp"), b"// stale").expect("touch stale");

        rename_cpp_outputs(tmp.path()).expect("rename");

        let contents = fs::read_to_string(tmp.path().join("msg.pb.cpp")).expect("read");
        assert_eq!(contents, "// fresh");
    }

    #[test]
    fn rename_ignores_unrelated_files() {
        let tmp = tempdir().expect("tempdir");
        fs::write(tmp.path().join("msg.pb.h"), b"").expect("touch header");
        fs::write(tmp.path().join("readme.txt"), b"").expect("touch other");

        let renamed = rename_cpp_outputs(tmp.path()).expect("rename");

        assert!(renamed.is_empty());
        assert!(tmp.path().join("msg.pb.h").exists());
    }
}
