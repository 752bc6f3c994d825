use kodegen_bundler_msi::metadata::load_manifest;
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Cargo.toml")
}

#[tokio::test]
async fn reads_msi_table_from_cargo_metadata() {
    let manifest = load_manifest(&["cargo".to_string()], Some(&fixture()), None)
        .await
        .unwrap();

    assert_eq!(manifest.package.product_name, "mock-configurator");
    assert_eq!(manifest.package.version, "1.3.0");
    assert_eq!(manifest.package.binaries.len(), 2);
    assert_eq!(manifest.msi_settings.executables, ["mock-configurator"]);
    assert_eq!(manifest.msi_settings.runtime_marker.as_deref(), Some("mingw64"));
    assert_eq!(
        manifest.msi_settings.sign.program_name.as_deref(),
        Some("Mock Configurator")
    );
    assert_eq!(
        manifest.project_directory.canonicalize().unwrap(),
        fixture().parent().unwrap().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn unknown_package_is_an_error() {
    let err = load_manifest(&["cargo".to_string()], Some(&fixture()), Some("missing"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing"), "{err}");
}
