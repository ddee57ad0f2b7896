use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde_json::Value;
use tracing::debug;

use crate::error::{ReadmeError, Result};

/// Default reflection executable.
pub const DEFAULT_TOOL: &str = "deno";

/// Where structured documentation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSource {
    /// Run `<program> doc --json <extra args> <entry>` and read its stdout.
    Tool {
        /// Executable name or path.
        program: String,
        /// Extra arguments inserted before the entry path.
        args: Vec<String>,
    },
    /// Read previously generated JSON from a file.
    File(PathBuf),
}

impl Default for DocSource {
    fn default() -> Self {
        Self::Tool {
            program: DEFAULT_TOOL.to_string(),
            args: Vec::new(),
        }
    }
}

impl DocSource {
    /// Produce the raw JSON value describing `entry`.
    ///
    /// This is a single blocking step; a tool that exits unsuccessfully aborts the run with
    /// [`ReadmeError::ReflectionFailed`].
    pub fn load(&self, entry: &Path) -> Result<Value> {
        let json = match self {
            Self::Tool { program, args } => run_tool(program, args, entry)?,
            Self::File(path) => fs::read_to_string(path)?,
        };
        Ok(serde_json::from_str(&json)?)
    }
}

/// Resolve `program` to an executable path.
///
/// Bare names are looked up on `PATH`; anything containing a path separator must exist.
pub fn locate_tool(program: &str) -> Result<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return if path.exists() {
            Ok(path.to_path_buf())
        } else {
            Err(ReadmeError::ToolNotFound(program.to_string()))
        };
    }
    which::which(program).map_err(|e| ReadmeError::ToolNotFound(format!("{program}: {e}")))
}

/// Run the reflection tool and capture its stdout.
fn run_tool(program: &str, args: &[String], entry: &Path) -> Result<String> {
    let exe = locate_tool(program)?;
    debug!(tool = %exe.display(), entry = %entry.display(), "running documentation tool");

    let output = Command::new(&exe)
        .args(["doc", "--json"])
        .args(args)
        .arg(entry)
        .stdin(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(ReadmeError::ReflectionFailed {
            // Killed by a signal: no code to propagate.
            code: output.status.code().unwrap_or(1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout)
        .map_err(|e| ReadmeError::MalformedInput(format!("tool output is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reads_file_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"[{"kind": "moduleDoc", "name": ""}]"#).unwrap();

        let value = DocSource::File(path).load(Path::new("mod.ts")).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn missing_tool() {
        assert!(matches!(
            locate_tool("./definitely/not/a/tool"),
            Err(ReadmeError::ToolNotFound(_))
        ));
        assert!(matches!(
            locate_tool("readmegen-no-such-tool-on-path"),
            Err(ReadmeError::ToolNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_propagates_status() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-doc");
        fs::write(&script, "#!/bin/sh\necho 'broken module' >&2\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let source = DocSource::Tool {
            program: script.to_string_lossy().into_owned(),
            args: Vec::new(),
        };
        match source.load(Path::new("mod.ts")) {
            Err(ReadmeError::ReflectionFailed { code, stderr }) => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken module");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn tool_output_is_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("fake-doc");
        fs::write(&script, "#!/bin/sh\necho '[]'\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let source = DocSource::Tool {
            program: script.to_string_lossy().into_owned(),
            args: vec!["--private".into()],
        };
        assert_eq!(source.load(Path::new("mod.ts")).unwrap(), Value::Array(vec![]));
    }
}
