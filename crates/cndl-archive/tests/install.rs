use std::fs;
use std::path::Path;

use cndl_archive::{Error, install_tree};
use flate2::Compression;
use flate2::write::GzEncoder;

fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn server_bundle_lands_in_commit_dir() {
    let work = tempfile::Builder::new().prefix("cndl-work-").tempdir().unwrap();
    let home = tempfile::Builder::new().prefix("cndl-home-").tempdir().unwrap();

    let archive = work.path().join("vscode-server-linux-x64.tar.gz");
    write_tar_gz(
        &archive,
        &[
            ("vscode-server-linux-x64/bin/code-server", &b"#!/bin/sh\necho ok\n"[..]),
            ("vscode-server-linux-x64/node", &b"\x7fELF"[..]),
        ],
    );

    let target = home.path().join(".vscode-server").join("bin").join("0ee08df0cf");
    let report = install_tree(&archive, work.path(), "vscode-server-linux-x64", &target).unwrap();

    assert_eq!(report.entry_count, 2);
    assert!(target.join("bin").join("code-server").is_file());
    assert_eq!(fs::read(target.join("node")).unwrap(), b"\x7fELF");
    assert!(!work.path().join("vscode-server-linux-x64").exists());
    // archive itself is kept
    assert!(archive.exists());
}

#[test]
fn leftover_extraction_is_refused() {
    let work = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    let archive = work.path().join("vscode-server-linux-x64.tar.gz");
    write_tar_gz(&archive, &[("vscode-server-linux-x64/node", &b"new"[..])]);

    let leftover = work.path().join("vscode-server-linux-x64");
    fs::create_dir_all(&leftover).unwrap();
    fs::write(leftover.join("stale.txt"), b"old").unwrap();

    let target = home.path().join(".vscode-server").join("bin").join("abc");
    let err = install_tree(&archive, work.path(), "vscode-server-linux-x64", &target).unwrap_err();

    assert!(matches!(err, Error::StaleExtraction { ref path } if path == &leftover), "{err}");
    assert!(!target.exists());
    // nothing was unpacked over the leftover
    assert!(!leftover.join("node").exists());
    assert_eq!(fs::read(leftover.join("stale.txt")).unwrap(), b"old");
}

#[test]
fn unexpected_top_level_is_fatal() {
    let work = tempfile::tempdir().unwrap();
    let archive = work.path().join("bundle.tar.gz");
    write_tar_gz(&archive, &[("vscode-reh-linux-x64/node", &b"x"[..])]);

    let target = work.path().join("home").join(".vscode-server").join("bin").join("abc");
    let err = install_tree(&archive, work.path(), "vscode-server-linux-x64", &target).unwrap_err();

    match err {
        Error::UnexpectedArchiveLayout { expected, found } => {
            assert_eq!(expected, Path::new("vscode-server-linux-x64"));
            assert_eq!(found, vec!["vscode-reh-linux-x64".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!target.exists());
    // parent directories are created before extraction
    assert!(target.parent().unwrap().is_dir());
}
