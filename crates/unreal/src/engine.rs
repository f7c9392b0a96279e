//! Engine install discovery.

use std::path::{Path, PathBuf};

use crate::EngineError;

/// Default install location used by the Epic Games launcher.
const LAUNCHER_INSTALL_ROOT: &str = "C:/Program Files/Epic Games";

/// A located Unreal Engine installation.
#[derive(Debug, Clone)]
pub struct Engine {
    root: PathBuf,
    version: String,
    is_source_build: bool,
}

impl Engine {
    /// Locates a launcher-installed engine, e.g. `launcher_build(5, 3)`.
    ///
    /// Checks the `UE_<major>.<minor>_DIR` environment variable first, then
    /// the default launcher install directory.
    pub fn launcher_build(major: u32, minor: u32) -> Result<Self, EngineError> {
        let version = format!("{major}.{minor}");
        tracing::info!(version, "looking for Unreal Engine");

        if let Ok(dir) = std::env::var(format!("UE_{version}_DIR")) {
            return Self::validated(PathBuf::from(dir), version, false);
        }

        let fallback = format!("{LAUNCHER_INSTALL_ROOT}/UE_{version}");
        if Path::new(&fallback).exists() {
            return Self::validated(PathBuf::from(&fallback), version, false);
        }

        Err(EngineError::NotFound { version, fallback })
    }

    /// Locates a source build registered under a custom GUID, resolved via
    /// the `UE_<guid>_DIR` environment variable.
    pub fn custom_build(guid: &str) -> Result<Self, EngineError> {
        tracing::info!(guid, "looking for custom Unreal Engine build");

        match std::env::var(format!("UE_{guid}_DIR")) {
            Ok(dir) => Self::validated(PathBuf::from(dir), guid.to_string(), true),
            Err(_) => Err(EngineError::NotFound {
                version: guid.to_string(),
                fallback: format!("UE_{guid}_DIR"),
            }),
        }
    }

    /// Uses an explicit engine root, validating it like the discovery paths.
    pub fn from_root(root: impl Into<PathBuf>, version: impl Into<String>) -> Result<Self, EngineError> {
        Self::validated(root.into(), version.into(), false)
    }

    fn validated(root: PathBuf, version: String, is_source_build: bool) -> Result<Self, EngineError> {
        let engine = Self {
            root,
            version,
            is_source_build,
        };

        // RunUAT existing is the cheapest proof this is a usable engine root.
        let uat = engine.uat_executable();
        if !uat.exists() {
            return Err(EngineError::InvalidInstall {
                root: engine.root.display().to_string(),
                missing: uat.display().to_string(),
            });
        }

        tracing::info!(root = %engine.root.display(), "found Unreal Engine installation");
        Ok(engine)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn is_source_build(&self) -> bool {
        self.is_source_build
    }

    /// `Engine/Build/BatchFiles` under the install root.
    pub fn batch_files_dir(&self) -> PathBuf {
        self.root.join("Engine/Build/BatchFiles")
    }

    /// Platform binaries directory holding the editor executables.
    pub fn binaries_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        let platform = "Win64";
        #[cfg(target_os = "macos")]
        let platform = "Mac";
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let platform = "Linux";

        self.root.join("Engine/Binaries").join(platform)
    }

    /// Full path to the RunUAT entry point.
    pub fn uat_executable(&self) -> PathBuf {
        let script = if cfg!(target_os = "windows") {
            "RunUAT.bat"
        } else {
            "RunUAT.sh"
        };
        self.batch_files_dir().join(script)
    }

    /// Full path to the headless editor binary (`UnrealEditor-Cmd`).
    pub fn editor_cmd_executable(&self) -> PathBuf {
        let exe = if cfg!(target_os = "windows") {
            "UnrealEditor-Cmd.exe"
        } else {
            "UnrealEditor-Cmd"
        };
        self.binaries_dir().join(exe)
    }

    /// Full path to the full editor binary.
    pub fn editor_executable(&self) -> PathBuf {
        let exe = if cfg!(target_os = "windows") {
            "UnrealEditor.exe"
        } else {
            "UnrealEditor"
        };
        self.binaries_dir().join(exe)
    }

    /// UAT wrapper bound to this installation.
    pub fn uat(&self) -> crate::Uat {
        crate::Uat::new(self.clone())
    }

    /// Editor wrapper bound to this installation.
    pub fn editor(&self) -> crate::Editor {
        crate::Editor::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_engine_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let batch = dir.path().join("Engine/Build/BatchFiles");
        std::fs::create_dir_all(&batch).unwrap();
        let script = if cfg!(target_os = "windows") {
            "RunUAT.bat"
        } else {
            "RunUAT.sh"
        };
        std::fs::write(batch.join(script), "").unwrap();
        dir
    }

    #[test]
    fn accepts_a_root_containing_runuat() {
        let dir = fake_engine_root();
        let engine = Engine::from_root(dir.path(), "5.3").unwrap();
        assert_eq!(engine.version(), "5.3");
        assert!(engine.uat_executable().exists());
    }

    #[test]
    fn rejects_a_root_without_runuat() {
        let dir = tempfile::tempdir().unwrap();
        let result = Engine::from_root(dir.path(), "5.3");
        assert!(matches!(result, Err(EngineError::InvalidInstall { .. })));
    }

    #[test]
    fn binaries_dir_is_under_the_root() {
        let dir = fake_engine_root();
        let engine = Engine::from_root(dir.path(), "5.3").unwrap();
        assert!(engine.binaries_dir().starts_with(dir.path()));
    }
}
