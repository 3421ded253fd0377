use cf_fs::*;
use std::path::Path;

#[test]
fn rooted_read_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut fs = FileSystem::rooted(dir.path());
    let out = Path::new("saida/recibo.pdf");
    assert!(!fs.exists(out));
    fs.write(out, b"%PDF-1.4").expect("write creates parent dirs");
    assert!(dir.path().join("saida/recibo.pdf").is_file());
    assert_eq!(fs.read(out).expect("read back"), b"%PDF-1.4");
    assert_eq!(fs.resolve(out), dir.path().join("saida/recibo.pdf"));
}

#[test]
fn absolute_paths_ignore_root() {
    let root = tempfile::tempdir().expect("tempdir");
    let elsewhere = tempfile::tempdir().expect("tempdir");
    let target = elsewhere.path().join("recibo.html");
    std::fs::write(&target, "<p>{{nome_cliente}}</p>").unwrap();

    let fs = FileSystem::rooted(root.path());
    assert!(fs.exists(&target));
    assert_eq!(fs.read_to_string(&target).unwrap(), "<p>{{nome_cliente}}</p>");
}

#[test]
fn missing_file_errs_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fs = FileSystem::rooted(dir.path());
    let err = fs.read(Path::new("backend/recibo.html")).unwrap_err();
    assert!(err.to_string().contains("recibo.html"), "{err}");
}
