use assert_cmd::prelude::*;
use std::process::Command;

type STDRESULT = Result<(), Box<dyn std::error::Error>>;

fn round_trip(sequence: &str) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("input.txt");
    let compressed_path = temp_dir.path().join("compressed.bc");
    let out_path = temp_dir.path().join("output.txt");
    std::fs::write(&in_path, sequence)?;

    Command::cargo_bin("biocompress")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&compressed_path)
        .assert()
        .success();

    Command::cargo_bin("biocompress")?
        .arg("expand")
        .arg("-i").arg(&compressed_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();

    let restored = std::fs::read_to_string(&out_path)?;
    assert_eq!(restored, sequence);
    Ok(())
}

#[test]
fn round_trips_a_short_sequence() -> STDRESULT {
    round_trip("AAAA")?;
    round_trip("ACGTACGT")?;
    round_trip("AATTAATT")
}

#[test]
fn round_trips_a_sequence_with_a_palindrome_half() -> STDRESULT {
    round_trip("ACGTACGTTGCATGCA")
}

#[test]
fn compress_rejects_foreign_characters() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("input.txt");
    let out_path = temp_dir.path().join("compressed.bc");
    std::fs::write(&in_path, "ACGN")?;

    Command::cargo_bin("biocompress")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&out_path)
        .assert()
        .failure();
    Ok(())
}

#[test]
fn compress_accepts_an_explicit_height() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = temp_dir.path().join("input.txt");
    let compressed_path = temp_dir.path().join("compressed.bc");
    let out_path = temp_dir.path().join("output.txt");
    std::fs::write(&in_path, "ACGTACGTACGTACGTACGTACGTACGT")?;

    Command::cargo_bin("biocompress")?
        .arg("compress")
        .arg("-i").arg(&in_path)
        .arg("-o").arg(&compressed_path)
        .arg("-H").arg("4")
        .assert()
        .success();

    Command::cargo_bin("biocompress")?
        .arg("expand")
        .arg("-i").arg(&compressed_path)
        .arg("-o").arg(&out_path)
        .assert()
        .success();

    let restored = std::fs::read_to_string(&out_path)?;
    assert_eq!(restored, "ACGTACGTACGTACGTACGTACGTACGT");
    Ok(())
}
