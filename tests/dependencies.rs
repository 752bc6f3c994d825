use kodegen_bundler_msi::bundler::Error;
use kodegen_bundler_msi::bundler::platform::windows::msi::dependencies::{
    DependencyEntry, ResolvedDependencies, find_dependencies, parse_dependency_report,
    resolve_all,
};
use std::path::PathBuf;

#[test]
fn documented_line_yields_root_and_entry() {
    let line = r"	libgtk-3-0.dll => C:\msys64\mingw32\bin\libgtk-3-0.dll (0x6f100000)";
    let resolved = parse_dependency_report(line, "mingw32").unwrap();

    assert_eq!(resolved.runtime_root, Some(PathBuf::from(r"C:\msys64\mingw32")));
    let entry = resolved.entries().next().unwrap();
    assert_eq!(entry.directory, PathBuf::from(r"C:\msys64\mingw32\bin"));
    assert_eq!(entry.file_name, "libgtk-3-0.dll");
}

#[test]
fn repeated_lines_collapse() {
    let report = "\
	libglib-2.0-0.dll => C:\\msys64\\mingw32\\bin\\libglib-2.0-0.dll (0x1)
		libglib-2.0-0.dll => C:\\msys64\\mingw32\\bin\\libglib-2.0-0.dll (0x1)
	libintl-8.dll => C:\\msys64\\mingw32\\bin\\libintl-8.dll (0x2)
";
    let resolved = parse_dependency_report(report, "mingw32").unwrap();
    assert_eq!(resolved.len(), 2);
}

#[test]
fn union_of_scans_counts_each_dll_once() {
    let exe = parse_dependency_report(
        "a => C:\\m\\mingw32\\bin\\a.dll\nb => C:\\m\\mingw32\\bin\\b.dll",
        "mingw32",
    )
    .unwrap();
    let plugin = parse_dependency_report(
        "b => C:\\m\\mingw32\\bin\\b.dll\nc => C:\\m\\mingw32\\bin\\c.dll",
        "mingw32",
    )
    .unwrap();

    let mut acc = ResolvedDependencies::default();
    acc.merge(exe);
    acc.merge(plugin);
    assert_eq!(acc.file_names().collect::<Vec<_>>(), ["a.dll", "b.dll", "c.dll"]);
}

#[test]
fn system_only_report_has_no_root() {
    let report = r"	KERNEL32.dll => C:\Windows\SYSTEM32\KERNEL32.dll (0x76e00000)";
    let resolved = parse_dependency_report(report, "mingw32").unwrap();
    assert!(resolved.is_empty());
    assert!(resolved.runtime_root.is_none());
}

#[tokio::test]
async fn missing_binary_is_reported_before_running_ntldd() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("app.exe");
    let err = find_dependencies(&exe, "mingw32").await.unwrap_err();
    assert!(err.to_string().contains("app.exe"), "{err}");
}

#[test]
fn same_file_name_from_another_runtime_keeps_the_first() {
    let mut acc = ResolvedDependencies::default();
    assert!(acc.insert(DependencyEntry {
        directory: PathBuf::from(r"C:\a\mingw32\bin"),
        file_name: "libz.dll".to_string(),
    }));
    assert!(!acc.insert(DependencyEntry {
        directory: PathBuf::from(r"D:\b\mingw32\bin"),
        file_name: "libz.dll".to_string(),
    }));

    assert_eq!(acc.len(), 1);
    assert_eq!(
        acc.entries().next().unwrap().source_path(),
        PathBuf::from(r"C:\a\mingw32\bin").join("libz.dll")
    );
}

#[tokio::test]
async fn plugins_without_runtime_root_are_rejected() {
    let plugin = PathBuf::from("lib/gdk-pixbuf-2.0/2.10.0/loaders/libpixbufloader-svg.dll");
    let err = resolve_all(&[], &[plugin], "mingw32").await.unwrap_err();

    match err {
        Error::NoRuntimeRoot { marker } => assert_eq!(marker, "mingw32"),
        other => panic!("unexpected error: {other}"),
    }
}
