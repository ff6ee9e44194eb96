//! Tool lookup on the command search path.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ToolSettings;

/// External tools the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    GdalEdit,
    GdalTranslate,
    Gdal2Tiles,
    Aws,
}

impl Tool {
    /// Configured executable for this tool.
    pub fn program<'a>(&self, settings: &'a ToolSettings) -> &'a str {
        match self {
            Tool::GdalEdit => &settings.gdal_edit,
            Tool::GdalTranslate => &settings.gdal_translate,
            Tool::Gdal2Tiles => &settings.gdal2tiles,
            Tool::Aws => &settings.aws,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tool::GdalEdit => "gdal_edit",
            Tool::GdalTranslate => "gdal_translate",
            Tool::Gdal2Tiles => "gdal2tiles",
            Tool::Aws => "aws",
        };
        f.write_str(name)
    }
}

/// Finds executables the way a shell would.
#[derive(Debug, Clone, Default)]
pub struct ToolResolver {
    /// Search path override (None = the process `PATH`).
    search_path: Option<OsString>,
}

impl ToolResolver {
    /// Resolver using the process `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver using an explicit search path.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }

    /// Resolve an executable name or path.
    ///
    /// Names containing a path separator are checked directly; bare names
    /// are looked up in each search path directory in order.
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }

        let path_var = match &self.search_path {
            Some(p) => p.clone(),
            None => env::var_os("PATH")?,
        };

        for dir in env::split_paths(&path_var) {
            let full = dir.join(program);
            if is_executable(&full) {
                return Some(full);
            }
            #[cfg(windows)]
            {
                let exe = dir.join(format!("{program}.exe"));
                if is_executable(&exe) {
                    return Some(exe);
                }
            }
        }
        None
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Executables for one run, after preflight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTools {
    pub gdal_edit: PathBuf,
    pub gdal_translate: PathBuf,
    pub gdal2tiles: PathBuf,
    /// Only resolved when an upload was requested.
    pub aws: Option<PathBuf>,
}

impl ResolvedTools {
    /// Use the configured names as-is, without checking the search path.
    #[cfg(test)]
    pub(crate) fn unchecked(settings: &ToolSettings) -> Self {
        Self {
            gdal_edit: PathBuf::from(&settings.gdal_edit),
            gdal_translate: PathBuf::from(&settings.gdal_translate),
            gdal2tiles: PathBuf::from(&settings.gdal2tiles),
            aws: Some(PathBuf::from(&settings.aws)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn finds_tool_in_search_path() {
        let dir = tempdir().unwrap();
        let expected = make_executable(dir.path(), "gdal2tiles.py");

        let resolver = ToolResolver::with_search_path(dir.path().as_os_str());
        assert_eq!(resolver.find("gdal2tiles.py"), Some(expected));
        assert_eq!(resolver.find("gdal_edit.py"), None);
    }

    #[test]
    fn searches_directories_in_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let expected = make_executable(first.path(), "aws");
        make_executable(second.path(), "aws");

        let joined = env::join_paths([first.path(), second.path()]).unwrap();
        let resolver = ToolResolver::with_search_path(joined);
        assert_eq!(resolver.find("aws"), Some(expected));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("gdal_translate"), "not a program").unwrap();

        let resolver = ToolResolver::with_search_path(dir.path().as_os_str());
        assert_eq!(resolver.find("gdal_translate"), None);
    }

    #[test]
    fn explicit_path_is_checked_directly() {
        let dir = tempdir().unwrap();
        let tool = make_executable(dir.path(), "gdal_edit.py");

        let resolver = ToolResolver::with_search_path("");
        let program = tool.to_string_lossy().to_string();
        assert_eq!(resolver.find(&program), Some(tool));
    }

    #[test]
    fn program_follows_settings() {
        let mut settings = ToolSettings::default();
        settings.gdal2tiles = "gdal2tiles".to_string();
        assert_eq!(Tool::Gdal2Tiles.program(&settings), "gdal2tiles");
        assert_eq!(Tool::GdalEdit.program(&settings), "gdal_edit.py");
    }
}
