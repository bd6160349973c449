use crate::common::{write_raw, write_source};
use ncd_convert::convert::{BatchConverter, ConvertOptions, ProgressEvent};
use ncd_convert::data::{parquet_files, verify_file};
use ncd_convert::record::{RecordKind, SourceFile};
use tempfile::TempDir;

#[test]
fn test_verify_directory_of_converted_files() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let files = vec![
        SourceFile::new(write_source(&src.path().join("tick/b.ncd"), RecordKind::Tick, 4)),
        SourceFile::new(write_source(&src.path().join("minute/a.ncd"), RecordKind::Minute, 6)),
    ];
    let mut converter = BatchConverter::new(files, out.path(), ConvertOptions::default());
    assert!(converter.run(&mut |_: ProgressEvent| {}).all_succeeded());

    let found = parquet_files(out.path(), "parquet").unwrap();
    assert_eq!(found, vec![out.path().join("a.parquet"), out.path().join("b.parquet")]);

    let reports: Vec<_> = found.iter().map(|p| verify_file(p)).collect();
    assert_eq!(reports[0].kind, Some(RecordKind::Minute));
    assert_eq!(reports[0].rows, 6);
    assert_eq!(reports[1].kind, Some(RecordKind::Tick));
    assert_eq!(reports[1].rows, 4);
    assert!(reports.iter().all(|r| r.passed()));
}

#[test]
fn test_verify_rejects_non_parquet() {
    let dir = TempDir::new().unwrap();
    let path = write_raw(&dir.path().join("fake.parquet"), b"not a parquet file");

    let report = verify_file(&path);
    assert!(!report.passed());
    assert_eq!(report.rows, 0);
    assert!(report.issues[0].starts_with("cannot read file"));
}
