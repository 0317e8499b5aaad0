//! Windows registry adapter for the Explorer "open with" shortcut
//!
//! Keys are relative to `HKEY_CLASSES_ROOT` and are edited through `reg.exe`.
//! Writing there needs an elevated process; a denied write surfaces as
//! [`ShellError::PermissionDenied`]. Other platforms report
//! [`ShellError::Unsupported`].

use std::process::Output;

use tracing::debug;

use crate::adapters::process_tools::capture;
use crate::domain::errors::{ShellError, ToolError};
use crate::ports::ShellIntegrationPort;

const HIVE: &str = "HKCR";

/// Registry-backed shell integration
#[derive(Debug, Default, Clone)]
pub struct RegistryShellAdapter;

impl RegistryShellAdapter {
    pub fn new() -> Self {
        Self
    }

    fn full_key(key: &str) -> String {
        format!(r"{}\{}", HIVE, key)
    }

    fn reg(args: &[&str]) -> Result<Output, ShellError> {
        if !cfg!(windows) {
            return Err(ShellError::Unsupported);
        }
        debug!(?args, "Running reg");
        capture("reg".as_ref(), args).map_err(|e| match e {
            ToolError::Launch { source, .. } => ShellError::Io(source),
            other => ShellError::Command(other.to_string()),
        })
    }
}

/// Map a finished `reg add`/`reg delete` to the shell error model
fn interpret(output: &Output) -> Result<(), ShellError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.to_lowercase().contains("access is denied") {
        return Err(ShellError::PermissionDenied);
    }
    Err(ShellError::Command(stderr.trim().to_string()))
}

impl ShellIntegrationPort for RegistryShellAdapter {
    fn exists(&self, key: &str) -> Result<bool, ShellError> {
        match Self::reg(&["query", &Self::full_key(key)]) {
            Ok(output) => Ok(output.status.success()),
            Err(ShellError::Unsupported) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn create(&self, key: &str, value: &str) -> Result<(), ShellError> {
        let output = Self::reg(&["add", &Self::full_key(key), "/ve", "/d", value, "/f"])?;
        interpret(&output)
    }

    fn delete(&self, key: &str) -> Result<(), ShellError> {
        let output = Self::reg(&["delete", &Self::full_key(key), "/f"])?;
        interpret(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn output(code: i32, stderr: &str) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_interpret_access_denied() {
        let denied = output(1, "ERROR: Access is denied.\r\n");
        assert!(matches!(interpret(&denied), Err(ShellError::PermissionDenied)));

        let other = output(1, "ERROR: Invalid key name.\r\n");
        match interpret(&other) {
            Err(ShellError::Command(message)) => assert_eq!(message, "ERROR: Invalid key name."),
            result => panic!("unexpected {:?}", result),
        }

        assert!(interpret(&output(0, "")).is_ok());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unsupported_off_windows() {
        let shell = RegistryShellAdapter::new();
        assert!(!shell.exists(r"*\shell\Open with Giffer").unwrap());
        assert!(matches!(
            shell.create(r"*\shell\Open with Giffer", "x"),
            Err(ShellError::Unsupported)
        ));
    }

    #[test]
    fn test_full_key_prefixes_hive() {
        assert_eq!(
            RegistryShellAdapter::full_key(r"*\shell\Open with Giffer"),
            r"HKCR\*\shell\Open with Giffer"
        );
    }
}
