//! End-to-end runs of the stress loop against a real temporary directory

use std::fs;
use std::path::Path;

use regex::Regex;
use strain_app::{
    RunLimit, ScriptedNames, StdFilesystem, StopToken, StrainConfig, StressLoop, UuidNames,
    WriteAccounting,
};
use strain_core::test_utils::LogCapture;
use strain_core::IndentContext;
use tempfile::TempDir;

fn config_in(dir: &Path, total_bytes: u64) -> StrainConfig {
    StrainConfig {
        output_dir: Some(dir.join("out")),
        total_bytes,
        ..Default::default()
    }
}

/// Index of the first line at or after `from` that satisfies `pred`
fn position_from(lines: &[String], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    lines[from..]
        .iter()
        .position(|l| pred(l))
        .map(|i| i + from)
}

#[test]
fn single_iteration_writes_8192_bytes_and_logs_in_order() {
    let temp = TempDir::new().unwrap();
    let indent = IndentContext::default();
    let capture = LogCapture::new();
    let mut stress = StressLoop::new(
        config_in(temp.path(), 8),
        StdFilesystem,
        UuidNames,
        indent.clone(),
    )
    .unwrap();

    let completed = tracing::subscriber::with_default(
        capture.subscriber("strain", indent.clone()),
        || {
            stress
                .run(RunLimit::Iterations(1), &StopToken::new())
                .unwrap()
        },
    );
    assert_eq!(completed, 1);

    let out = temp.path().join("out");
    let entries: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);
    let blob = &entries[0];
    assert_eq!(fs::metadata(blob).unwrap().len(), 8192);
    assert!(blob.extension().is_none());

    let name = blob.file_name().unwrap().to_str().unwrap();
    let uuid_re =
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .unwrap();
    assert!(uuid_re.is_match(name), "not a v4 uuid: {name}");

    let lines = capture.lines();
    let started = position_from(&lines, 0, |l| l.ends_with("| Started step 0")).unwrap();
    let mut cursor = started + 1;
    for op in 1..=8 {
        let expected = format!(". (wrote {op} of 8)");
        cursor = position_from(&lines, cursor, |l| l.ends_with(&expected))
            .unwrap_or_else(|| panic!("missing progress line {op}"))
            + 1;
    }
    let done = position_from(&lines, cursor, |l| l.ends_with("| Done.")).unwrap();
    assert!(done > started);

    assert_eq!(lines.iter().filter(|l| l.contains("Started step")).count(), 1);
    assert_eq!(lines.iter().filter(|l| l.contains(". (wrote ")).count(), 8);
    assert_eq!(lines.iter().filter(|l| l.ends_with("| Done.")).count(), 1);
}

#[test]
fn every_line_uses_the_pipe_format() {
    let temp = TempDir::new().unwrap();
    let indent = IndentContext::default();
    let capture = LogCapture::new();
    let mut stress = StressLoop::new(
        config_in(temp.path(), 16),
        StdFilesystem,
        UuidNames,
        indent.clone(),
    )
    .unwrap();

    tracing::subscriber::with_default(capture.subscriber("strain", indent.clone()), || {
        stress
            .run(RunLimit::Iterations(2), &StopToken::new())
            .unwrap();
    });

    let line_re = Regex::new(
        r"^strain {7}\| (INFO|WARNING) +\| \d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3} +\| ( *)\S",
    )
    .unwrap();
    let lines = capture.lines();
    assert!(!lines.is_empty());
    for line in &lines {
        let caps = line_re
            .captures(line)
            .unwrap_or_else(|| panic!("bad line: {line:?}"));
        // Indents come in whole depth units; the completion message has its own leading space
        if !line.contains(" done: wrote") {
            assert_eq!(caps[2].len() % 4, 0, "odd indent: {line:?}");
        }
    }
    assert_eq!(indent.delta(), 0);
}

#[test]
fn forced_collision_is_replaced_not_fatal() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let mut stress = StressLoop::new(
        config_in(temp.path(), 8),
        StdFilesystem,
        ScriptedNames::new(["alpha", "beta"]),
        IndentContext::default(),
    )
    .unwrap();

    stress
        .run(RunLimit::Iterations(1), &StopToken::new())
        .unwrap();
    fs::write(out.join("beta"), b"left over from a crashed run").unwrap();

    stress
        .run(RunLimit::Iterations(1), &StopToken::new())
        .unwrap();

    assert_eq!(fs::metadata(out.join("alpha")).unwrap().len(), 8192);
    assert_eq!(fs::metadata(out.join("beta")).unwrap().len(), 8192);
}

#[test]
fn byte_accounting_pins_exact_size() {
    let temp = TempDir::new().unwrap();
    let config = StrainConfig {
        accounting: WriteAccounting::Bytes,
        ..config_in(temp.path(), 8)
    };
    let mut stress =
        StressLoop::new(config, StdFilesystem, UuidNames, IndentContext::default()).unwrap();

    let summary = stress.step().unwrap();
    assert_eq!(summary.operations, 1);
    assert_eq!(fs::metadata(&summary.path).unwrap().len(), 8);
}
