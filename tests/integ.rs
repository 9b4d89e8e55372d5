mod utils;

use std::fs::File;
use std::io::{Seek, SeekFrom};
use tempfile::tempdir;
use tracker_save::constants::{HEADER_INIT_OFFSET, HEADER_OFFSET, RB_MARKER_2_OFFSET, SONG_IMAGE_LEN};
use tracker_save::{read_save, read_song_image, write_save, write_song_image, Name, Save, SongImage};
use utils::{enable_logging, incompressible_song, sample_save};

#[test]
fn save_round_trips_through_a_real_file() {
    enable_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("song.sav");

    let save = sample_save(12);
    {
        let mut file = File::create(&path).unwrap();
        write_save(&save, &mut file).unwrap();
    }

    let mut file = File::open(&path).unwrap();
    let decoded = read_save(&mut file).unwrap();
    assert_eq!(decoded.song, save.song);
    assert_eq!(decoded.projects[0].song, save.projects[0].song);
}

#[test]
fn corrupted_init_marker_is_a_format_error() {
    enable_logging();
    let save = Save::empty(12);
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_save(&save, &mut cursor).unwrap();
    let mut bytes = cursor.into_inner();
    bytes[HEADER_OFFSET + HEADER_INIT_OFFSET] = b'X';

    let mut cursor = std::io::Cursor::new(bytes);
    let err = read_save(&mut cursor).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn corrupted_rb_marker_is_a_format_error() {
    enable_logging();
    let song = SongImage::new(12);
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_song_image(&song, &mut cursor).unwrap();
    let mut bytes = cursor.into_inner();
    bytes[RB_MARKER_2_OFFSET] = 0;

    let mut cursor = std::io::Cursor::new(bytes);
    let err = read_song_image(&mut cursor).unwrap_err();
    assert!(err.is_format());
}

#[test]
fn truncated_stream_is_an_io_error() {
    enable_logging();
    let mut cursor = std::io::Cursor::new(vec![0u8; SONG_IMAGE_LEN - 1]);
    let err = read_song_image(&mut cursor).unwrap_err();
    assert!(err.is_io());
}

#[test]
fn unallocated_slots_carry_default_fill_on_disk() {
    enable_logging();
    let save = Save::empty(12);
    let mut cursor = std::io::Cursor::new(Vec::new());
    write_save(&save, &mut cursor).unwrap();
    cursor.seek(SeekFrom::Start(0)).unwrap();
    let decoded = read_save(&mut cursor).unwrap();

    // Every instrument slot is absent in a freshly emptied song: reading back yields the
    // canonical default instrument payload and an empty name for each one.
    for i in 0..tracker_save::constants::INSTRUMENT_COUNT {
        assert!(!decoded.song.instrument_alloc.get(i));
        assert_eq!(
            decoded.song.instruments.entries[i].as_bytes(),
            &tracker_save::constants::DEFAULT_INSTRUMENT
        );
        assert!(decoded.song.instruments.names[i].is_empty());
    }
}

#[test]
fn too_many_large_projects_fail_with_capacity_error() {
    enable_logging();
    let mut save = Save::empty(12);
    // each of these songs is close to fully incompressible (~64 blocks); four of them
    // cannot possibly fit in the 191-block budget.
    for slot in 0..4 {
        save.assign_song(
            slot,
            Name::from_str_lossy("BIG"),
            0,
            incompressible_song(12, slot as u8),
        );
    }

    let mut cursor = std::io::Cursor::new(Vec::new());
    let err = write_save(&save, &mut cursor).unwrap_err();
    assert!(err.is_capacity());
}
