use std::fs;
use std::path::{Path, PathBuf};

use eprime2tsv::convert;

/// E-Prime logs are UTF-16LE with a BOM.
fn utf16_bytes(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

fn write_log(root: &Path, subject: &str, body: &str) -> PathBuf {
    let session_dir = root.join(subject);
    fs::create_dir_all(&session_dir).unwrap();
    let path = session_dir.join("EMOTION.txt");
    fs::write(&path, utf16_bytes(body)).unwrap();
    path
}

fn header_and_sync() -> String {
    [
        "*** Header Start ***",
        "Subject: 10006",
        "*** Header End ***",
        "Procedure: SyncPROC",
        "SyncSlide.OnsetTime: 39118",
    ]
    .join("\r\n")
        + "\r\n"
}

fn trial(category: &str, onset_ms: i64, rt_ms: i64, acc: i64, cresp: &str, resp: &str) -> String {
    format!(
        "Procedure: TrialsPROC\r\n\
         BlockList: {category}\r\n\
         StimSlide.OnsetTime: {onset_ms}\r\n\
         StimSlide.OnsetToOnsetTime: 2000\r\n\
         StimSlide.RT: {rt_ms}\r\n\
         StimSlide.ACC: {acc}\r\n\
         StimSlide.CRESP: {cresp}\r\n\
         StimSlide.RESP: {resp}\r\n"
    )
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split('\t').map(str::to_owned).collect())
        .collect()
}

#[test]
fn two_trials_produce_two_ordered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let body = header_and_sync()
        + &trial("ShapeBlock", 44320, 812, 1, "c", "c")
        + &trial("FaceBlock", 47440, 1034, 0, "d", "c");
    let log = write_log(dir.path(), "OPT01_UP1_10006_01", &body);
    let dest = dir.path().join("out");

    let out = convert(&log, &dest).unwrap();
    assert_eq!(
        out.file_name().unwrap().to_str().unwrap(),
        "OPT01_UP1_10006_01_FACES.tsv"
    );
    assert!(out.with_extension("json").exists());

    let rows = read_rows(&out);
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        [
            "onset",
            "duration",
            "trial_type",
            "response_time",
            "accuracy",
            "correct_response",
            "participant_response",
        ]
    );
    assert_eq!(
        rows[1],
        ["5.202", "2.000", "Shapes", "0.812", "1", "1", "1"]
    );
    assert_eq!(
        rows[2],
        ["8.322", "2.000", "Faces", "1.034", "0", "2", "1"]
    );
}

#[test]
fn log_without_trials_yields_header_only_table() {
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(dir.path(), "sub-01", &header_and_sync());
    let out = convert(&log, &dir.path().join("out")).unwrap();
    assert_eq!(read_rows(&out).len(), 1);
}

#[test]
fn missing_accuracy_line_blanks_only_that_row() {
    let dir = tempfile::tempdir().unwrap();
    let incomplete = "Procedure: TrialsPROC\r\n\
                      BlockList: FaceBlock\r\n\
                      StimSlide.OnsetTime: 47440\r\n\
                      StimSlide.OnsetToOnsetTime: 2000\r\n\
                      StimSlide.RT: 0\r\n\
                      StimSlide.CRESP: 2\r\n\
                      StimSlide.RESP:\r\n";
    let body = header_and_sync() + &trial("ShapeBlock", 44320, 812, 1, "c", "c") + incomplete;
    let log = write_log(dir.path(), "sub-02", &body);

    let rows = read_rows(&convert(&log, &dir.path().join("out")).unwrap());
    assert_eq!(rows[1][4], "1");
    assert_eq!(rows[2][4], "n/a");
    // numeric correct_response passes through, unanswered response stays null
    assert_eq!(rows[2][5], "2");
    assert_eq!(rows[2][6], "n/a");
}

#[test]
fn duplicate_field_tag_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let body = header_and_sync()
        + "Procedure: TrialsPROC\r\n\
           BlockList: ShapeBlock\r\n\
           StimSlide.RT: 500\r\n\
           StimSlide.RT: 600\r\n";
    let log = write_log(dir.path(), "sub-03", &body);
    let dest = dir.path().join("out");

    assert!(convert(&log, &dest).is_err());
    assert!(!dest.join("sub-03_FACES.tsv").exists());
}

#[test]
fn unrecognized_response_code_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let body = header_and_sync() + &trial("FaceBlock", 44320, 812, 1, "c", "x");
    let log = write_log(dir.path(), "sub-04", &body);
    assert!(convert(&log, &dir.path().join("out")).is_err());
}

#[test]
fn trials_without_sync_baseline_abort() {
    let dir = tempfile::tempdir().unwrap();
    let body = trial("ShapeBlock", 44320, 812, 1, "c", "c");
    let log = write_log(dir.path(), "sub-05", &body);
    assert!(convert(&log, &dir.path().join("out")).is_err());
}

#[test]
fn undecodable_bytes_abort() {
    let dir = tempfile::tempdir().unwrap();
    let session_dir = dir.path().join("sub-06");
    fs::create_dir_all(&session_dir).unwrap();
    let path = session_dir.join("EMOTION.txt");
    // BOM followed by a lone high surrogate
    fs::write(&path, [0xFF, 0xFE, 0x00, 0xD8]).unwrap();
    assert!(convert(&path, &dir.path().join("out")).is_err());
}
