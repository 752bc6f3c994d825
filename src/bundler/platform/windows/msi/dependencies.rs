//! Runtime DLL discovery.
//!
//! `ntldd -R` prints one line per DLL an executable loads, transitively:
//!
//! ```text
//!     libgtk-3-0.dll => C:\msys64\mingw32\bin\libgtk-3-0.dll (0x6f100000)
//!     KERNEL32.dll => C:\Windows\SYSTEM32\KERNEL32.dll (0x76e00000)
//! ```
//!
//! Only DLLs living in the `bin` directory of the MinGW runtime are shipped;
//! system DLLs are ignored. The grammar, matched case-insensitively, is
//!
//! ```text
//! => (?<root>.*\\<marker>)\\bin\\(?<file>\S+\.dll)
//! ```
//!
//! where `<marker>` is the runtime directory name such as `mingw32`.

use crate::bundler::{
    builder::tool_detection,
    error::{Error, Result},
    utils::command,
};
use regex::RegexBuilder;
use std::{
    collections::{BTreeMap, btree_map},
    path::{Path, PathBuf},
};
use tokio::process::Command;

/// A DLL to ship: the directory it was resolved from and its file name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DependencyEntry {
    /// Directory holding the DLL, e.g. `C:\msys64\mingw32\bin`.
    pub directory: PathBuf,
    /// File name, e.g. `libgtk-3-0.dll`.
    pub file_name: String,
}

impl DependencyEntry {
    /// Full path of the DLL.
    pub fn source_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Accumulated result of one or more dependency scans.
///
/// DLLs are staged flat into one directory, so entries are keyed by file
/// name, compared case-insensitively. The first directory seen for a name
/// wins.
#[derive(Clone, Debug, Default)]
pub struct ResolvedDependencies {
    entries: BTreeMap<String, DependencyEntry>,
    /// Root of the runtime distribution, e.g. `C:\msys64\mingw32`.
    pub runtime_root: Option<PathBuf>,
}

impl ResolvedDependencies {
    /// Adds `entry` unless a DLL of the same name is already known.
    ///
    /// Returns whether the entry was added. A same-named DLL from another
    /// directory is skipped with a warning.
    pub fn insert(&mut self, entry: DependencyEntry) -> bool {
        match self.entries.entry(entry.file_name.to_ascii_lowercase()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
            btree_map::Entry::Occupied(kept) => {
                let kept = kept.get();
                if !same_directory(&kept.directory, &entry.directory) {
                    log::warn!(
                        "Skipping {} from {}, already shipping the one from {}",
                        entry.file_name,
                        entry.directory.display(),
                        kept.directory.display()
                    );
                }
                false
            }
        }
    }

    /// Unions `other` into `self`.
    ///
    /// The first known runtime root is kept. A later scan reporting a
    /// different root is logged, and its DLLs are only added when no DLL of
    /// the same name is known yet.
    pub fn merge(&mut self, other: ResolvedDependencies) {
        match (&self.runtime_root, other.runtime_root) {
            (None, root) => self.runtime_root = root,
            (Some(current), Some(root)) if !same_directory(current, &root) => {
                log::warn!(
                    "Dependency scan reported runtime root {} but {} is already in use",
                    root.display(),
                    current.display()
                );
            }
            _ => {}
        }
        for entry in other.entries.into_values() {
            self.insert(entry);
        }
    }

    /// DLLs ordered by file name.
    pub fn entries(&self) -> impl Iterator<Item = &DependencyEntry> {
        self.entries.values()
    }

    /// Number of unique DLLs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no DLLs were found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// DLL file names in order.
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries().map(|e| e.file_name.as_str())
    }
}

/// Windows paths compare case-insensitively.
fn same_directory(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy())
}

/// Parses `ntldd` output into the DLLs found under the `marker` runtime.
///
/// Every matching line contributes one entry; duplicate lines collapse.
/// The runtime root is that of the last matching line, or `None` when no
/// line matched.
pub fn parse_dependency_report(report: &str, marker: &str) -> Result<ResolvedDependencies> {
    let pattern = format!(r"=> (.*\\{})\\bin\\(\S+\.dll)", regex::escape(marker));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::GenericError(format!("invalid dependency pattern: {}", e)))?;

    let mut resolved = ResolvedDependencies::default();
    for line in report.lines() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        let root = &caps[1];
        let file_name = &caps[2];
        log::debug!("Found {} in {}", file_name, root);

        resolved.insert(DependencyEntry {
            directory: PathBuf::from(format!(r"{}\bin", root)),
            file_name: file_name.to_string(),
        });
        resolved.runtime_root = Some(PathBuf::from(root));
    }

    Ok(resolved)
}

/// Runs `ntldd -R` on `binary` and parses its report.
///
/// # Errors
///
/// [`Error::MissingFile`] if `binary` does not exist, or the tool's failure.
pub async fn find_dependencies(binary: &Path, marker: &str) -> Result<ResolvedDependencies> {
    if !binary.exists() {
        return Err(Error::MissingFile(binary.to_path_buf()));
    }

    let ntldd = tool_detection::require("ntldd")?;
    let report = command::output(Command::new(ntldd).arg("-R").arg(binary), "ntldd").await?;

    let resolved = parse_dependency_report(&report, marker)?;
    log::info!(
        "{} links {} {} DLLs",
        binary.display(),
        resolved.len(),
        marker
    );
    Ok(resolved)
}

/// Resolves the DLLs of every executable, then of every runtime plugin.
///
/// Plugins are given relative to the runtime root, which must have been
/// discovered from the executables.
pub async fn resolve_all(
    executables: &[PathBuf],
    plugins: &[PathBuf],
    marker: &str,
) -> Result<ResolvedDependencies> {
    let mut resolved = ResolvedDependencies::default();
    for exe in executables {
        resolved.merge(find_dependencies(exe, marker).await?);
    }

    if !plugins.is_empty() {
        let root = resolved
            .runtime_root
            .clone()
            .ok_or_else(|| Error::NoRuntimeRoot {
                marker: marker.to_string(),
            })?;
        for plugin in plugins {
            let scan = find_dependencies(&root.join(plugin), marker).await?;
            for entry in scan.entries.into_values() {
                resolved.insert(entry);
            }
        }
    }

    Ok(resolved)
}
