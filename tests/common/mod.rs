//! Builders for small in memory MIDI files
#![allow(dead_code)]

use std::{fs, path::PathBuf};

use tempfile::TempDir;

/// Wraps a payload in a chunk preamble
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend((payload.len() as u32).to_be_bytes());
    bytes.extend(payload);
    bytes
}

/// A format 1 file with the given division and tracks, declaring exactly `declared` tracks
pub fn smf_declaring(declared: u16, division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut header = vec![0x00, 0x01];
    header.extend(declared.to_be_bytes());
    header.extend(division.to_be_bytes());

    let mut bytes = chunk(b"MThd", &header);
    for track in tracks {
        bytes.extend(chunk(b"MTrk", track));
    }
    bytes
}

/// A well formed format 1 file
pub fn smf(division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    smf_declaring(tracks.len() as u16, division, tracks)
}

/// Track body starting with a name meta event
pub fn named_track(name: &str, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0x00, 0xFF, 0x03, name.len() as u8];
    bytes.extend(name.as_bytes());
    bytes.extend(body);
    bytes.extend([0x00, 0xFF, 0x2F, 0x00]);
    bytes
}

/// Writes `bytes` as `file_name` inside a fresh temporary directory
pub fn write_temp(file_name: &str, bytes: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Create temporary directory");
    let path = dir.path().join(file_name);
    fs::write(&path, bytes).expect("Write MIDI fixture");
    (dir, path)
}
