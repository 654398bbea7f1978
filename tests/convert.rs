mod common;

use common::{named_track, smf, smf_declaring, write_temp};
use midi2chip::{convert, convert_durations, MidiError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Tempo track at 500,000 us per quarter note (120 BPM)
fn tempo_track() -> Vec<u8> {
    named_track("Tempo Track", &[0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20])
}

#[test]
fn converts_a_two_track_song() {
    let lead = named_track(
        "Lead",
        &[
            0x00, 0x90, 69, 100, //
            0x83, 0x60, 0x80, 69, 64, //
            0x00, 0x90, 81, 100, //
            0x83, 0x60, 81, 0, //
            0x00, 57, 100,
        ],
    );
    let (_dir, path) = write_temp("overworld.mid", &smf(480, &[tempo_track(), lead]));

    let document = convert(&path).expect("Convert song");
    let value: Value = serde_json::from_str(&document.to_json(false).expect("Serialize"))
        .expect("Output is valid JSON");

    assert_eq!(
        value,
        json!({
            "song_name": "overworld",
            "tempo": 120.0,
            "ticks_per_beat": 480,
            "notes": [
                {"pulse1": [440.0], "pulse2": [0], "triangle": [0], "noise": 0, "tick": 0},
                {"pulse1": [880.0], "pulse2": [0], "triangle": [0], "noise": 0, "tick": 480},
                {"pulse1": [220.0], "pulse2": [0], "triangle": [0], "noise": 0, "tick": 960},
            ]
        })
    )
}

#[test]
fn tempo_track_with_notes_is_still_skipped() {
    let tempo = named_track("Tempo Track", &[0x00, 0x90, 48, 100]);
    let lead = named_track("Lead", &[0x10, 0x90, 72, 100]);
    let (_dir, path) = write_temp("skip.mid", &smf(96, &[tempo, lead]));

    let document = convert(&path).expect("Convert song");

    assert_eq!(document.notes.len(), 1);
    assert_eq!(document.notes[0].frequency(), 523.25);
    assert_eq!(document.notes[0].tick(), 16)
}

#[test]
fn missing_tempo_defaults_to_120() {
    let lead = named_track("Lead", &[0x00, 0x90, 60, 100]);
    let (_dir, path) = write_temp("plain.mid", &smf(480, &[lead]));

    assert_eq!(convert(&path).expect("Convert song").tempo, 120.0)
}

#[test]
fn odd_tempo_is_rounded() {
    // 461,538 us per quarter note is 130.0001... BPM
    let tempo = named_track("Tempo Track", &[0x00, 0xFF, 0x51, 0x03, 0x07, 0x0A, 0xE2]);
    let (_dir, path) = write_temp("fast.mid", &smf(480, &[tempo]));

    assert_eq!(convert(&path).expect("Convert song").tempo, 130.0)
}

#[test]
fn no_melody_yields_empty_notes() {
    let (_dir, path) = write_temp("silence.mid", &smf(480, &[tempo_track()]));

    let document = convert(&path).expect("Missing melody is not fatal");

    assert!(document.notes.is_empty());
    assert_eq!(document.song_name, "silence")
}

#[test]
fn every_note_has_the_fixed_channel_shape() {
    let lead = named_track(
        "Lead",
        &[0x00, 0x90, 60, 90, 0x20, 62, 90, 0x20, 64, 90, 0x20, 0x80, 64, 0],
    );
    let (_dir, path) = write_temp("shape.mid", &smf(480, &[lead]));

    let json = convert(&path).expect("Convert song").to_json(false).expect("Serialize");
    let value: Value = serde_json::from_str(&json).expect("Output is valid JSON");
    let notes = value["notes"].as_array().expect("Notes array");

    assert_eq!(notes.len(), 3);
    for note in notes {
        assert_eq!(note["pulse2"], json!([0]));
        assert_eq!(note["triangle"], json!([0]));
        assert_eq!(note["noise"], json!(0));
        assert_eq!(note["pulse1"].as_array().map(Vec::len), Some(1));
    }
    let ticks: Vec<u64> = notes.iter().filter_map(|n| n["tick"].as_u64()).collect();
    assert_eq!(ticks, vec![0, 32, 64])
}

#[test]
fn resolution_is_always_480() {
    let lead = named_track("Lead", &[0x18, 0x90, 60, 90]);
    let (_dir, path) = write_temp("low.mid", &smf(24, &[lead]));

    let document = convert(&path).expect("Convert song");

    assert_eq!(document.ticks_per_beat, 480);
    assert_eq!(document.notes[0].tick(), 24)
}

#[test]
fn song_name_keeps_inner_dots() {
    let (_dir, path) = write_temp("boss.theme.mid", &smf(480, &[tempo_track()]));

    assert_eq!(convert(&path).expect("Convert song").song_name, "boss.theme")
}

#[test]
fn truncated_file_is_unexpected_eof() {
    let bytes = smf_declaring(2, 480, &[tempo_track()]);
    let (_dir, path) = write_temp("short.mid", &bytes);

    let error = convert(&path).expect_err("Second track is missing");

    assert!(error.is_unexpected_eof(), "got {error:?}")
}

#[test]
fn smpte_file_is_rejected() {
    let (_dir, path) = write_temp("smpte.mid", &smf(0xE728, &[tempo_track()]));

    assert!(matches!(
        convert(&path),
        Err(MidiError::UnsupportedTimeDivision(_))
    ))
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("Create temporary directory");

    assert!(matches!(
        convert(dir.path().join("nope.mid")),
        Err(MidiError::Io(_))
    ))
}

#[test]
fn odd_time_signatures_do_not_fail_the_file() {
    let track = vec![
        0x00, 0xFF, 0x58, 0x02, 0x04, 0x02, //
        0x00, 0x90, 0x45, 0x64,
    ];
    let (_dir, path) = write_temp("meter.mid", &smf(480, &[track]));

    let document = convert(&path).expect("Convert song with a short time signature");

    assert_eq!(document.notes.len(), 1);
    assert_eq!(document.notes[0].frequency(), 440.0)
}

#[test]
fn durations_come_from_the_melody_track() {
    let lead = named_track(
        "Lead",
        &[
            0x00, 0x90, 69, 100, //
            0x81, 0x40, 0x80, 69, 64, // off after 192 ticks
        ],
    );
    let (_dir, path) = write_temp("held.mid", &smf(480, &[tempo_track(), lead]));

    let sheet = convert_durations(&path).expect("Convert song");

    assert_eq!(sheet.song_name, "held");
    assert_eq!(sheet.tempo, 120.0);
    assert_eq!(sheet.notes.len(), 1);
    assert_eq!((sheet.notes[0].frequency, sheet.notes[0].duration), (440.0, 192))
}
