mod utils;

use std::io::{Cursor, Seek, SeekFrom};
use tracker_save::{read_save, read_song_image, write_save, write_song_image, Save, SongImage};
use utils::{enable_logging, sample_save, sample_song};

fn song_round_trip(song: &SongImage) -> SongImage {
    let mut cursor = Cursor::new(Vec::new());
    write_song_image(song, &mut cursor).unwrap();
    cursor.seek(SeekFrom::Start(0)).unwrap();
    read_song_image(&mut cursor).unwrap()
}

fn save_round_trip(save: &Save) -> Save {
    let mut cursor = Cursor::new(Vec::new());
    write_save(save, &mut cursor).unwrap();
    cursor.seek(SeekFrom::Start(0)).unwrap();
    read_save(&mut cursor).unwrap()
}

#[test]
fn default_song_image_round_trips() {
    enable_logging();
    let song = SongImage::new(12);
    assert_eq!(song_round_trip(&song), song);
}

#[test]
fn populated_song_image_round_trips() {
    enable_logging();
    let song = sample_song(12);
    assert_eq!(song_round_trip(&song), song);
}

#[test]
fn default_save_round_trips() {
    enable_logging();
    let save = Save::empty(12);
    assert_eq!(save_round_trip(&save), save);
}

#[test]
fn populated_save_round_trips() {
    enable_logging();
    let save = sample_save(12);
    let decoded = save_round_trip(&save);
    assert_eq!(decoded.active_project, save.active_project);
    assert_eq!(decoded.song, save.song);
    assert_eq!(decoded.projects, save.projects);
}

#[test]
fn a_save_with_every_slot_filled_round_trips() {
    enable_logging();
    let mut save = Save::empty(12);
    for slot in 0..tracker_save::constants::PROJECT_COUNT {
        let mut song = SongImage::new(12);
        song.meta.tempo = slot as u8;
        save.assign_song(
            slot,
            tracker_save::Name::from_str_lossy(&format!("S{:02}", slot)),
            0,
            song,
        );
    }

    let decoded = save_round_trip(&save);
    for slot in 0..tracker_save::constants::PROJECT_COUNT {
        assert!(decoded.is_allocated(slot));
        assert_eq!(
            decoded.projects[slot].song.as_ref().unwrap().meta.tempo,
            slot as u8
        );
    }
}

#[test]
fn compression_round_trip_is_stable_across_repeated_writes() {
    enable_logging();
    let save = sample_save(12);
    let first = {
        let mut cursor = Cursor::new(Vec::new());
        write_save(&save, &mut cursor).unwrap();
        cursor.into_inner()
    };
    let second = {
        let mut cursor = Cursor::new(Vec::new());
        write_save(&save, &mut cursor).unwrap();
        cursor.into_inner()
    };
    assert_eq!(first, second);
}
