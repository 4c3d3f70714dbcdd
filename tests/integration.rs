/// End-to-end tests of the `paired-bed12` binary.
///
/// Each test writes a small name-grouped BAM with noodles into a temporary
/// directory, runs the binary on it, and checks the BED12 lines on stdout and
/// the records written to the unprocessed BAM.
use noodles::core::Position;
use noodles::sam::alignment::io::Write as _;
use noodles::sam::alignment::record::cigar::{Op, op::Kind};
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::RecordBuf;
use noodles::sam::header::record::value::{Map, map::ReferenceSequence};
use noodles::{bam, sam};
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// ── helpers ──────────────────────────────────────────────────────────────────

fn header() -> sam::Header {
    let len = NonZeroUsize::try_from(1_000_000).unwrap();
    sam::Header::builder()
        .add_reference_sequence("chr1", Map::<ReferenceSequence>::new(len))
        .add_reference_sequence("chr2", Map::<ReferenceSequence>::new(len))
        .build()
}

/// Build a mapped record; `pos` is 0-based like BED.
fn record(name: &str, flags: Flags, ref_id: usize, pos: usize, mapq: u8, ops: &[(Kind, usize)]) -> RecordBuf {
    RecordBuf::builder()
        .set_name(name)
        .set_flags(flags)
        .set_reference_sequence_id(ref_id)
        .set_alignment_start(Position::try_from(pos + 1).unwrap())
        .set_mapping_quality(MappingQuality::new(mapq).unwrap())
        .set_cigar(ops.iter().map(|&(kind, len)| Op::new(kind, len)).collect())
        .build()
}

fn read1(reverse: bool) -> Flags {
    let mut flags = Flags::SEGMENTED | Flags::PROPERLY_SEGMENTED | Flags::FIRST_SEGMENT;
    if reverse {
        flags.insert(Flags::REVERSE_COMPLEMENTED);
    }
    flags
}

fn read2(reverse: bool) -> Flags {
    let mut flags = Flags::SEGMENTED | Flags::PROPERLY_SEGMENTED | Flags::LAST_SEGMENT;
    if reverse {
        flags.insert(Flags::REVERSE_COMPLEMENTED);
    }
    flags
}

fn write_bam(path: &Path, records: &[RecordBuf]) {
    let header = header();
    let mut writer = bam::io::Writer::new(File::create(path).expect("create BAM"));
    writer.write_header(&header).expect("write header");
    for record in records {
        writer.write_alignment_record(&header, record).expect("write record");
    }
    writer.finish(&header).expect("finish BAM");
}

fn count_bam_records(path: &Path) -> usize {
    let mut reader = bam::io::reader::Builder
        .build_from_path(path)
        .expect("open BAM");
    reader.read_header().expect("read header");
    let mut count = 0usize;
    let mut record = bam::Record::default();
    loop {
        match reader.read_record(&mut record) {
            Ok(0) => break,
            Ok(_) => count += 1,
            Err(e) => panic!("read_record error: {e}"),
        }
    }
    count
}

fn paired_bed12_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_paired-bed12"))
}

fn run_binary(args: &[&str]) -> Output {
    Command::new(paired_bed12_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn paired-bed12")
}

/// A grouped input with one good pair, one spliced pair on chr2, one low-MAPQ
/// pair and one improperly paired record.
fn sample_records() -> Vec<RecordBuf> {
    let m = Kind::Match;
    vec![
        record("good", read1(false), 0, 100, 30, &[(m, 50)]),
        record("good", read2(true), 0, 150, 30, &[(m, 50)]),
        record("single", Flags::SEGMENTED, 0, 400, 60, &[(m, 50)]),
        record("spliced", read2(false), 1, 2000, 20, &[(m, 25)]),
        record("spliced", read1(true), 1, 1000, 40, &[(m, 20), (Kind::Skip, 100), (m, 30)]),
        record("low", read1(false), 0, 5000, 2, &[(m, 50)]),
        record("low", read2(true), 0, 5100, 3, &[(m, 50)]),
    ]
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[test]
fn converts_pairs_and_writes_unprocessed_bam() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.bam");
    let unprocessed = dir.path().join("unprocessed.bam");
    write_bam(&input, &sample_records());

    let output = run_binary(&[
        "-i",
        input.to_str().unwrap(),
        "-Q",
        "10",
        "-x",
        unprocessed.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "chr1\t100\t200\tgood\t60\t+\t100\t150\t255,0,0\t2\t50,50\t0,50\n\
         chr2\t1000\t2025\tspliced\t60\t-\t1000\t1150\t255,0,0\t3\t20,30,25\t0,120,1000\n"
    );
    // "single" plus both mates of "low".
    assert_eq!(count_bam_records(&unprocessed), 3);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("producing 2 BED12 entries"), "{stderr}");
}

#[test]
fn reads_standard_input_and_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("input.bam");
    write_bam(&input, &sample_records());

    let run_stdin = || {
        Command::new(paired_bed12_bin())
            .args(["-q", "--dblock", "-c", "0,0,255"])
            .stdin(Stdio::from(File::open(&input).unwrap()))
            .output()
            .expect("failed to spawn paired-bed12")
    };
    let first = run_stdin();
    let second = run_stdin();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let stdout = String::from_utf8(first.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.lines().all(|l| l.split('\t').nth(8) == Some("0,0,255")));
    // Quiet mode keeps the summary off stderr.
    assert!(!String::from_utf8_lossy(&first.stderr).contains("BED12 entries"));
}

#[test]
fn ungrouped_input_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("unsorted.bam");
    let m = Kind::Match;
    let records: Vec<RecordBuf> = (0..4)
        .map(|i| record(&format!("r{i}"), read1(false), 0, 100 * i, 10, &[(m, 10)]))
        .collect();
    write_bam(&input, &records);

    let output = run_binary(&["-i", input.to_str().unwrap(), "--max-pending", "3"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sorted/grouped by query name"), "{stderr}");
    assert!(stderr.contains("r3"), "{stderr}");
}

#[test]
fn unknown_flag_prints_usage_and_fails() {
    let output = run_binary(&["--no-such-flag"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}
