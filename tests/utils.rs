#![allow(dead_code)]

use log::LevelFilter;
use std::sync::Once;
use tracker_save::save::Project;
use tracker_save::song::chain::Chain;
use tracker_save::song::instrument::Instrument;
use tracker_save::{Name, Save, SongImage};

static LOGGER: Once = Once::new();

pub fn enable_logging() {
    LOGGER.call_once(logger_init)
}

fn logger_init() {
    env_logger::Builder::new()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{}:{} [{}] - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Warn)
        .init();
}

/// A song image with a handful of allocated entities, useful whenever a test needs
/// "some data" rather than the all-default empty image.
pub fn sample_song(version: u8) -> SongImage {
    let mut song = SongImage::new(version);

    song.chain_alloc.set(0, true);
    song.chains.entries[0] = Chain {
        phrases: [0; 16],
        transpositions: [0; 16],
    };

    song.phrase_alloc.set(0, true);
    song.phrases.entries[0].notes[0] = 60;
    song.phrases.entries[0].instruments[0] = 0;

    song.instrument_alloc.set(0, true);
    song.instruments.entries[0] = Instrument::from_bytes([1; 16]);
    song.instruments.names[0] = Name::from_str_lossy("LEAD");

    song.rows.entries[0].channels[0] = 0;
    song.meta.tempo = 128;

    song
}

/// A save with one project occupying slot 0, built from [`sample_song`].
pub fn sample_save(version: u8) -> Save {
    let mut save = Save::empty(version);
    save.assign_song(0, Name::from_str_lossy("DEMO"), 0, sample_song(version));
    save.active_project = Some(0);
    save
}

pub fn empty_project_slot() -> Project {
    Project::empty()
}

/// A song whose every controllable region is filled with non-repeating noise, so that
/// its compressed form is close to its full 32 KiB size (no runs, no default-wave/
/// instrument matches). Used to exercise the capacity-exhaustion path without relying on
/// a precise byte count.
pub fn incompressible_song(version: u8, seed: u8) -> SongImage {
    let mut song = SongImage::new(version);
    let mut counter: u32 = seed as u32 * 104729;
    let mut next_byte = move || {
        counter = counter.wrapping_mul(1103515245).wrapping_add(12345);
        (counter >> 16) as u8
    };

    for row in song.rows.entries.iter_mut() {
        for c in row.channels.iter_mut() {
            *c = next_byte();
        }
    }
    for i in 0..tracker_save::constants::CHAIN_COUNT {
        song.chain_alloc.set(i, true);
        for p in song.chains.entries[i].phrases.iter_mut() {
            *p = next_byte();
        }
        for t in song.chains.entries[i].transpositions.iter_mut() {
            *t = next_byte() as i8;
        }
    }
    for i in 0..tracker_save::constants::PHRASE_COUNT {
        song.phrase_alloc.set(i, true);
        let phrase = &mut song.phrases.entries[i];
        for b in phrase.notes.iter_mut() {
            *b = next_byte();
        }
        for b in phrase.instruments.iter_mut() {
            *b = next_byte();
        }
        for b in phrase.command_codes.iter_mut() {
            *b = next_byte();
        }
        for b in phrase.command_values.iter_mut() {
            *b = next_byte();
        }
    }
    for i in 0..tracker_save::constants::INSTRUMENT_COUNT {
        song.instrument_alloc.set(i, true);
        let mut bytes = [0u8; 16];
        for b in bytes.iter_mut() {
            *b = next_byte();
        }
        song.instruments.entries[i] = Instrument::from_bytes(bytes);
    }
    for i in 0..tracker_save::constants::TABLE_COUNT {
        song.table_alloc.set(i, true);
        let table = &mut song.tables.entries[i];
        for b in table.envelopes.iter_mut() {
            *b = next_byte();
        }
        for b in table.transpositions.iter_mut() {
            *b = next_byte();
        }
        for b in table.value1.iter_mut() {
            *b = next_byte();
        }
        for b in table.value2.iter_mut() {
            *b = next_byte();
        }
    }
    for synth in song.synths.entries.iter_mut() {
        for b in synth.params.iter_mut() {
            *b = next_byte();
        }
    }
    for wave in song.waves.entries.iter_mut() {
        for b in wave.samples.iter_mut() {
            *b = next_byte();
        }
    }
    for groove in song.grooves.entries.iter_mut() {
        for b in groove.steps.iter_mut() {
            *b = next_byte();
        }
    }
    for word in song.words.entries.iter_mut() {
        for b in word.allophones.iter_mut() {
            *b = next_byte();
        }
        for b in word.lengths.iter_mut() {
            *b = next_byte();
        }
    }
    for b in song.reserved.reserved_6100.iter_mut() {
        *b = next_byte();
    }

    song
}
