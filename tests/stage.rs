use kodegen_bundler_msi::bundler::Error;
use kodegen_bundler_msi::bundler::platform::windows::msi::{
    dependencies::{DependencyEntry, ResolvedDependencies},
    stage::{StagePlan, assemble},
};
use std::fs;
use std::path::{Path, PathBuf};

/// A fake runtime root with a bin directory and some data files.
fn runtime(root: &Path) -> ResolvedDependencies {
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("bin/libfoo-1.dll"), "foo").unwrap();
    fs::write(root.join("bin/libbar-2.dll"), "bar").unwrap();
    fs::create_dir_all(root.join("share/icons/hicolor")).unwrap();
    fs::write(root.join("share/icons/hicolor/index.theme"), "[Icon Theme]").unwrap();
    fs::create_dir_all(root.join("lib/p11-kit")).unwrap();
    fs::write(root.join("lib/p11-kit/p11-kit-remote.exe"), "").unwrap();

    let mut deps = ResolvedDependencies::default();
    deps.runtime_root = Some(root.to_path_buf());
    for name in ["libfoo-1.dll", "libbar-2.dll"] {
        deps.insert(DependencyEntry {
            directory: root.join("bin"),
            file_name: name.to_string(),
        });
    }
    deps
}

#[tokio::test]
async fn assembles_tree_and_removes_stale_files() {
    let dir = tempfile::tempdir().unwrap();
    let deps = runtime(&dir.path().join("mingw32"));
    let project = dir.path().join("project");
    fs::create_dir_all(project.join("data/icons")).unwrap();
    fs::write(project.join("data/icons/app.svg"), "<svg/>").unwrap();

    let out = dir.path().join("work/out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.dll"), "old").unwrap();

    let runtime_files = [
        PathBuf::from("share/icons/hicolor/index.theme"),
        PathBuf::from("lib/p11-kit"),
    ];
    let plan = StagePlan {
        out_dir: &out,
        executables: &[],
        dependencies: &deps,
        overlays: vec![(project.join("data/icons"), PathBuf::from("share/icons"))],
        runtime_files: &runtime_files,
    };

    assemble(&plan).await.unwrap();
    assemble(&plan).await.unwrap();

    assert!(!out.join("stale.dll").exists());
    assert_eq!(fs::read_to_string(out.join("libfoo-1.dll")).unwrap(), "foo");
    assert!(out.join("libbar-2.dll").is_file());
    assert!(out.join("share/icons/app.svg").is_file());
    assert!(out.join("share/icons/hicolor/index.theme").is_file());
    assert!(out.join("lib/p11-kit/p11-kit-remote.exe").is_file());
}

#[tokio::test]
async fn runtime_files_need_a_runtime_root() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let deps = ResolvedDependencies::default();
    let runtime_files = [PathBuf::from("share/icons/hicolor/index.theme")];

    let err = assemble(&StagePlan {
        out_dir: &out,
        executables: &[],
        dependencies: &deps,
        overlays: Vec::new(),
        runtime_files: &runtime_files,
    })
    .await
    .unwrap_err();

    assert!(err.to_string().contains("runtime root"), "{err}");
}

#[tokio::test]
async fn missing_dependency_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut deps = ResolvedDependencies::default();
    deps.insert(DependencyEntry {
        directory: dir.path().join("bin"),
        file_name: "libgone.dll".to_string(),
    });

    let result = assemble(&StagePlan {
        out_dir: &dir.path().join("out"),
        executables: &[],
        dependencies: &deps,
        overlays: Vec::new(),
        runtime_files: &[],
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn missing_executable_is_reported_before_stripping() {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("target/release/app.exe");
    let deps = ResolvedDependencies::default();

    let err = assemble(&StagePlan {
        out_dir: &dir.path().join("out"),
        executables: std::slice::from_ref(&exe),
        dependencies: &deps,
        overlays: Vec::new(),
        runtime_files: &[],
    })
    .await
    .unwrap_err();

    match err {
        Error::MissingFile(path) => assert_eq!(path, exe),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn same_named_dll_from_second_root_is_staged_once() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a/mingw32/bin");
    let second = dir.path().join("b/mingw32/bin");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();
    fs::write(first.join("libz.dll"), "first").unwrap();
    fs::write(second.join("libz.dll"), "second").unwrap();

    let mut deps = ResolvedDependencies::default();
    for directory in [&first, &second] {
        deps.insert(DependencyEntry {
            directory: directory.to_path_buf(),
            file_name: "libz.dll".to_string(),
        });
    }
    let out = dir.path().join("out");

    assemble(&StagePlan {
        out_dir: &out,
        executables: &[],
        dependencies: &deps,
        overlays: Vec::new(),
        runtime_files: &[],
    })
    .await
    .unwrap();

    assert_eq!(fs::read_to_string(out.join("libz.dll")).unwrap(), "first");
}
