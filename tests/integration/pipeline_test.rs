use crate::common::{tick_quote, write_raw, write_source};
use ncd_convert::codec::NcdWriter;
use ncd_convert::convert::{
    BatchConverter, BatchSummary, ConversionOutcome, ConvertOptions, ProgressEvent,
};
use ncd_convert::data::verify_file;
use ncd_convert::error::ErrorKind;
use ncd_convert::record::{RecordKind, SourceFile, TickQuote};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run_batch(files: Vec<SourceFile>, output: &Path) -> (BatchSummary, Vec<ProgressEvent>) {
    let mut converter = BatchConverter::new(files, output, ConvertOptions::default());
    let mut events = Vec::new();
    let summary = converter.run(&mut |e: ProgressEvent| events.push(e)).clone();
    (summary, events)
}

#[test]
fn test_one_outcome_per_file_in_input_order() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let good_minute = write_source(
        &src.path().join("minute/ES/20250101.ncd"),
        RecordKind::Minute,
        30,
    );
    let malformed = write_raw(&src.path().join("tick/NQ/broken.ncd"), &[0xAB; 16]);
    let good_tick = write_source(
        &src.path().join("tick/NQ/20250102.ncd"),
        RecordKind::Tick,
        12,
    );

    let files = vec![
        SourceFile::new(&good_minute),
        SourceFile::new(&malformed),
        SourceFile::new(&good_tick),
    ];
    let (summary, _) = run_batch(files, out.path());

    assert_eq!(summary.len(), 3);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.total_records(), 42);

    let sources: Vec<_> = summary.outcomes.iter().map(|o| o.source().to_path_buf()).collect();
    assert_eq!(sources, vec![good_minute, malformed, good_tick]);

    assert_eq!(summary.outcomes[0].kind(), RecordKind::Minute);
    assert_eq!(summary.outcomes[1].error(), Some(ErrorKind::Format));
    assert_eq!(summary.outcomes[2].kind(), RecordKind::Tick);

    assert!(out.path().join("20250101.parquet").exists());
    assert!(out.path().join("20250102.parquet").exists());
    assert!(!out.path().join("broken.parquet").exists());
}

#[test]
fn test_failed_file_leaves_no_output_behind() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let path = write_source(&src.path().join("minute/ES.ncd"), RecordKind::Minute, 5);
    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 7);
    fs::write(&path, bytes).unwrap();

    let (summary, _) = run_batch(vec![SourceFile::new(&path)], out.path());

    match &summary.outcomes[0] {
        ConversionOutcome::Failed {
            error,
            records_decoded,
            ..
        } => {
            assert_eq!(*error, ErrorKind::Io);
            assert_eq!(*records_decoded, 4);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_source_produces_empty_table() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let path = write_source(&src.path().join("tick/empty.ncd"), RecordKind::Tick, 0);
    let (summary, _) = run_batch(vec![SourceFile::new(&path)], out.path());

    assert!(summary.all_succeeded());
    assert_eq!(summary.outcomes[0].records(), 0);

    let report = verify_file(&out.path().join("empty.parquet"));
    assert!(report.passed(), "{:?}", report.issues);
    assert_eq!(report.kind, Some(RecordKind::Tick));
    assert_eq!(report.rows, 0);
}

#[test]
fn test_misclassified_file_is_rejected() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    // Tick data stored under a minute directory
    let path = write_source(&src.path().join("minute/NQ.ncd"), RecordKind::Tick, 3);
    let (summary, _) = run_batch(vec![SourceFile::new(&path)], out.path());

    assert_eq!(summary.outcomes[0].kind(), RecordKind::Minute);
    assert_eq!(summary.outcomes[0].error(), Some(ErrorKind::Format));
}

#[test]
fn test_kind_override_bypasses_classification() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let path = write_source(&src.path().join("archive/NQ.ncd"), RecordKind::Tick, 3);
    let files = vec![SourceFile::with_kind(&path, RecordKind::Tick)];
    let (summary, _) = run_batch(files, out.path());

    assert!(summary.all_succeeded());
    assert_eq!(summary.outcomes[0].records(), 3);
}

#[test]
fn test_missing_source_is_io_failure() {
    let out = TempDir::new().unwrap();
    let missing = out.path().join("minute/nope.ncd");

    let (summary, _) = run_batch(vec![SourceFile::new(&missing)], out.path());

    assert_eq!(summary.outcomes[0].error(), Some(ErrorKind::Io));
}

#[test]
fn test_progress_is_monotonic_and_ends_at_100() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let files: Vec<_> = (0..4)
        .map(|i| {
            let path = src.path().join(format!("minute/{}.ncd", i));
            SourceFile::new(write_source(&path, RecordKind::Minute, 2))
        })
        .collect();
    let (_, events) = run_batch(files, out.path());

    assert_eq!(events.len(), 5);
    for pair in events.windows(2) {
        assert!(pair[1].percent >= pair[0].percent);
        assert!(pair[1].completed >= pair[0].completed);
    }
    let last = events.last().unwrap();
    assert!(last.is_final());
    assert_eq!(last.percent, 100.0);
    assert!(events[..4].iter().all(|e| !e.is_final()));
}

#[test]
fn test_empty_batch_reports_completion() {
    let out = TempDir::new().unwrap();
    let (summary, events) = run_batch(Vec::new(), out.path());

    assert!(summary.is_empty());
    assert!(summary.all_succeeded());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].percent, 100.0);
}

#[test]
fn test_converted_values_survive() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let path = write_source(&src.path().join("minute/ES.ncd"), RecordKind::Minute, 10);
    let (summary, _) = run_batch(vec![SourceFile::new(&path)], out.path());
    assert!(summary.all_succeeded());

    let report = verify_file(&out.path().join("ES.parquet"));
    assert!(report.passed());
    assert_eq!(report.rows, 10);
    assert_eq!(report.out_of_order, 0);
    // lows start at 4999, highs end at 5011
    assert_eq!(report.min_price, Some(4_999.0));
    assert_eq!(report.max_price, Some(5_011.0));
    assert_eq!(report.total_volume, (100..110).sum::<i64>());
    assert_eq!(report.first_timestamp, Some(crate::common::ts(0)));
    assert_eq!(report.last_timestamp, Some(crate::common::ts(9)));
}

#[test]
fn test_bad_frame_mid_file_isolated() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let bad = src.path().join("tick/NQ/bad.ncd");
    fs::create_dir_all(bad.parent().unwrap()).unwrap();
    let mut writer = NcdWriter::create(&bad, RecordKind::Tick).unwrap();
    for i in 0..4 {
        writer.write_record(&tick_quote(i).into()).unwrap();
    }
    let negative = TickQuote {
        volume: -3,
        ..tick_quote(4)
    };
    writer.write_record(&negative.into()).unwrap();
    writer.write_record(&tick_quote(5).into()).unwrap();
    writer.finish().unwrap();

    let good = write_source(&src.path().join("tick/NQ/good.ncd"), RecordKind::Tick, 6);

    let (summary, _) = run_batch(vec![SourceFile::new(&bad), SourceFile::new(&good)], out.path());

    match &summary.outcomes[0] {
        ConversionOutcome::Failed {
            error,
            message,
            records_decoded,
            ..
        } => {
            assert_eq!(*error, ErrorKind::Format);
            assert_eq!(*records_decoded, 4);
            assert!(message.contains("after 4 records"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(summary.outcomes[1].is_success());
    assert_eq!(summary.outcomes[1].records(), 6);

    let mut written: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, ["good.parquet"]);
}

#[test]
fn test_same_stem_does_not_overwrite() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let es = write_source(
        &src.path().join("minute/ES 03-25/20250103.ncd"),
        RecordKind::Minute,
        3,
    );
    let nq = write_source(
        &src.path().join("minute/NQ 03-25/20250103.ncd"),
        RecordKind::Minute,
        5,
    );

    let (summary, _) = run_batch(vec![SourceFile::new(&es), SourceFile::new(&nq)], out.path());

    assert!(summary.outcomes[0].is_success());
    assert_eq!(summary.outcomes[0].records(), 3);
    match &summary.outcomes[1] {
        ConversionOutcome::Failed { error, message, .. } => {
            assert_eq!(*error, ErrorKind::DuplicateOutput);
            assert!(message.contains("ES 03-25"), "{}", message);
        }
        other => panic!("expected failure, got {:?}", other),
    }

    let report = verify_file(&out.path().join("20250103.parquet"));
    assert_eq!(report.rows, 3);
}
