use kodegen_bundler_msi::bundler::{
    Error,
    utils::{
        archive::extract_zip,
        fs::{partial_path, write_atomically},
    },
};
use std::fs;
use std::io::Write;
use zip::{ZipWriter, write::SimpleFileOptions};

#[tokio::test]
async fn failed_write_leaves_no_destination() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("CodeSignTool.zip");
    fs::write(partial_path(&dest), b"stale").unwrap();

    let result = write_atomically(&dest, |partial| async move {
        fs::write(&partial, b"half").unwrap();
        Err::<(), Error>(Error::GenericError("connection reset".into()))
    })
    .await;

    assert!(result.is_err());
    assert!(!dest.exists());
    assert!(!partial_path(&dest).exists());

    write_atomically(&dest, |partial| async move {
        tokio::fs::write(&partial, b"complete").await?;
        Ok::<(), Error>(())
    })
    .await
    .unwrap();

    assert_eq!(fs::read(&dest).unwrap(), b"complete");
    assert!(!partial_path(&dest).exists());
}

#[tokio::test]
async fn extracts_zip_into_place() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("CodeSignTool.zip");
    {
        let mut zip = ZipWriter::new(fs::File::create(&archive).unwrap());
        let options = SimpleFileOptions::default();
        zip.add_directory("jar/", options).unwrap();
        zip.start_file("CodeSignTool.bat", options).unwrap();
        zip.write_all(b"@echo off").unwrap();
        zip.start_file("jar/code_sign_tool.jar", options).unwrap();
        zip.write_all(b"jar").unwrap();
        zip.finish().unwrap();
    }

    let dest = dir.path().join("CodeSignTool");
    fs::create_dir_all(partial_path(&dest)).unwrap();
    fs::write(partial_path(&dest).join("leftover"), b"x").unwrap();

    extract_zip(&archive, &dest).await.unwrap();

    assert_eq!(fs::read(dest.join("CodeSignTool.bat")).unwrap(), b"@echo off");
    assert!(dest.join("jar/code_sign_tool.jar").is_file());
    assert!(!dest.join("leftover").exists());
    assert!(!partial_path(&dest).exists());
}

#[tokio::test]
async fn corrupt_archive_leaves_no_directory() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("CodeSignTool.zip");
    fs::write(&archive, b"not a zip").unwrap();
    let dest = dir.path().join("CodeSignTool");

    assert!(extract_zip(&archive, &dest).await.is_err());
    assert!(!dest.exists());
    assert!(!partial_path(&dest).exists());
}
