//! The save container: the top-level 131,072-byte aggregate of one working song, up to
//! 32 named project slots, and the compressed block region backing them.
//!
//! Grounded on the reference filesystem's block-owner scan (`alloc_table().iter()...`)
//! and its `insert_file`/`remove_file`/`decompress` shape, restructured into the
//! teacher's `read_inner`-then-flush orchestration style used for its own container type.
use crate::byte_stream::{ByteStream, ByteStreamExt};
use crate::codec;
use crate::constants::*;
use crate::error::LibResult;
use crate::name::Name;
use crate::song::{self, SongImage};
use log::debug;
use snafu::ensure;
use std::io::Cursor;

/// One project slot: a name and version that are always present, and a song that exists
/// only once blocks have actually been allocated to this slot (or assigned in memory).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Project {
    pub name: Name<PROJECT_NAME_LEN>,
    pub version: u8,
    pub song: Option<SongImage>,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            name: Name::empty(),
            version: 0,
            song: None,
        }
    }

    /// A project slot is allocated exactly when it owns a song.
    pub fn is_allocated(&self) -> bool {
        self.song.is_some()
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::empty()
    }
}

/// The header's raw fields: project names and versions (one set per slot), an opaque
/// padding run, and the active-project index.
struct Header {
    names: [Name<PROJECT_NAME_LEN>; PROJECT_COUNT],
    versions: [u8; PROJECT_COUNT],
    padding: [u8; HEADER_PADDING_LEN],
    active_project: Option<u8>,
}

fn parse_header(buf: &[u8]) -> LibResult<Header> {
    debug_assert_eq!(buf.len(), HEADER_LEN);
    let init = &buf[HEADER_INIT_OFFSET..HEADER_INIT_OFFSET + HEADER_INIT_LEN];
    ensure!(
        init == INIT_MARKER,
        crate::error::Format {
            site: site!(),
            description: "bad init: save is missing the \"jk\" initialization marker",
        }
    );

    let mut names = [Name::empty(); PROJECT_COUNT];
    for i in 0..PROJECT_COUNT {
        let off = HEADER_NAMES_OFFSET + i * PROJECT_NAME_LEN;
        names[i] = Name::from_bytes(
            buf[off..off + PROJECT_NAME_LEN]
                .try_into()
                .expect("slice length matches PROJECT_NAME_LEN"),
        );
    }

    let mut versions = [0u8; PROJECT_COUNT];
    versions.copy_from_slice(&buf[HEADER_VERSIONS_OFFSET..HEADER_VERSIONS_OFFSET + PROJECT_COUNT]);

    let mut padding = [0u8; HEADER_PADDING_LEN];
    padding.copy_from_slice(&buf[HEADER_PADDING_OFFSET..HEADER_PADDING_OFFSET + HEADER_PADDING_LEN]);

    let active_byte = buf[HEADER_ACTIVE_OFFSET];
    let active_project = if active_byte == NO_ACTIVE_PROJECT {
        None
    } else {
        Some(active_byte)
    };

    Ok(Header {
        names,
        versions,
        padding,
        active_project,
    })
}

fn write_header(header: &Header) -> [u8; HEADER_LEN] {
    let mut buf = [0u8; HEADER_LEN];
    for i in 0..PROJECT_COUNT {
        let off = HEADER_NAMES_OFFSET + i * PROJECT_NAME_LEN;
        buf[off..off + PROJECT_NAME_LEN].copy_from_slice(header.names[i].as_bytes());
    }
    buf[HEADER_VERSIONS_OFFSET..HEADER_VERSIONS_OFFSET + PROJECT_COUNT]
        .copy_from_slice(&header.versions);
    buf[HEADER_PADDING_OFFSET..HEADER_PADDING_OFFSET + HEADER_PADDING_LEN]
        .copy_from_slice(&header.padding);
    buf[HEADER_INIT_OFFSET..HEADER_INIT_OFFSET + HEADER_INIT_LEN].copy_from_slice(&INIT_MARKER);
    buf[HEADER_ACTIVE_OFFSET] = header.active_project.unwrap_or(NO_ACTIVE_PROJECT);
    buf
}

/// The whole save: one working song plus 32 project slots.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Save {
    pub song: SongImage,
    pub projects: Vec<Project>,
    pub active_project: Option<u8>,
    /// Opaque header padding, preserved byte-for-byte like the song image's reserved
    /// regions; never interpreted.
    pub header_padding: [u8; HEADER_PADDING_LEN],
}

impl Save {
    /// A freshly initialized, valid save: every project slot empty, no active project, a
    /// default working song of the given format version.
    pub fn empty(version: u8) -> Self {
        Self {
            song: SongImage::new(version),
            projects: (0..PROJECT_COUNT).map(|_| Project::empty()).collect(),
            active_project: None,
            header_padding: [0u8; HEADER_PADDING_LEN],
        }
    }

    /// Reset a project slot to empty: zeroed name, zeroed version, no song.
    pub fn clear_project(&mut self, slot: usize) {
        self.projects[slot] = Project::empty();
        if self.active_project == Some(slot as u8) {
            self.active_project = None;
        }
    }

    /// Assign a song to a project slot, replacing whatever was there.
    pub fn assign_song(&mut self, slot: usize, name: Name<PROJECT_NAME_LEN>, version: u8, song: SongImage) {
        self.projects[slot] = Project {
            name,
            version,
            song: Some(song),
        };
    }

    /// Whether the given slot currently owns a song.
    pub fn is_allocated(&self, slot: usize) -> bool {
        self.projects[slot].is_allocated()
    }
}

/// Absolute offset of the start of the given 0-based data block in the save buffer.
fn data_block_offset(block: usize) -> usize {
    BLOCKS_OFFSET + block * BLOCK_SIZE
}

fn parse_buffer(buf: &[u8]) -> LibResult<Save> {
    debug_assert_eq!(buf.len(), SAVE_LEN);

    let header = parse_header(&buf[HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN])?;
    let owner_table = &buf[OWNER_TABLE_OFFSET..OWNER_TABLE_OFFSET + OWNER_TABLE_LEN];

    let mut projects: Vec<Project> = (0..PROJECT_COUNT)
        .map(|i| Project {
            name: header.names[i],
            version: header.versions[i],
            song: None,
        })
        .collect();

    for block in 0..BLOCK_COUNT {
        let owner = owner_table[block];
        if owner == FREE_BLOCK {
            continue;
        }
        let slot = owner as usize;
        if projects[slot].song.is_some() {
            // already decoded transitively via an earlier block's jump chain
            continue;
        }

        let mut reader = Cursor::new(buf.to_vec());
        reader.seek_abs(data_block_offset(block) as u64)?;
        let mut writer = Cursor::new(Vec::with_capacity(SONG_IMAGE_LEN));
        codec::decompress(&mut reader, &mut writer, BLOCKS_OFFSET as u64, true)?;
        let song = song::parse_buffer(&writer.into_inner())?;
        debug!("save: decoded project {} starting at block {}", slot, block);
        projects[slot].song = Some(song);
    }

    let working_song = song::parse_buffer(&buf[0..SONG_IMAGE_LEN])?;

    Ok(Save {
        song: working_song,
        projects,
        active_project: header.active_project,
        header_padding: header.padding,
    })
}

fn write_buffer(save: &Save) -> LibResult<Vec<u8>> {
    ensure!(
        save.projects.len() == PROJECT_COUNT,
        crate::error::Format {
            site: site!(),
            description: format!(
                "expected exactly {} project slots, got {}",
                PROJECT_COUNT,
                save.projects.len()
            ),
        }
    );

    let mut buf = vec![0u8; SAVE_LEN];
    buf[0..SONG_IMAGE_LEN].copy_from_slice(&song::write_buffer(&save.song)?);

    let mut blocks = Cursor::new(vec![0u8; BLOCK_SIZE * BLOCK_COUNT]);
    let mut owner_table = vec![FREE_BLOCK; BLOCK_COUNT];
    let mut current_block: u8 = 0;

    let mut names = [Name::empty(); PROJECT_COUNT];
    let mut versions = [0u8; PROJECT_COUNT];

    for (i, project) in save.projects.iter().enumerate() {
        names[i] = project.name;
        versions[i] = project.version;

        if let Some(song) = &project.song {
            let song_bytes = song::write_buffer(song)?;
            blocks.seek_abs((current_block as usize * BLOCK_SIZE) as u64)?;
            let used = codec::compress(&song_bytes, &mut blocks, current_block)?;
            for b in current_block..current_block + used {
                owner_table[b as usize] = i as u8;
            }
            current_block += used;
        }
    }

    let header = Header {
        names,
        versions,
        padding: save.header_padding,
        active_project: save.active_project,
    };
    buf[HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN].copy_from_slice(&write_header(&header));
    buf[OWNER_TABLE_OFFSET..OWNER_TABLE_OFFSET + OWNER_TABLE_LEN].copy_from_slice(&owner_table);
    buf[BLOCKS_OFFSET..BLOCKS_OFFSET + BLOCK_SIZE * BLOCK_COUNT].copy_from_slice(&blocks.into_inner());

    Ok(buf)
}

/// Read a whole [`Save`] from a 131,072-byte stream.
pub fn read_save(stream: &mut impl ByteStream) -> crate::Result<Save> {
    let bytes = stream.read_exact_n(SAVE_LEN).map_err(crate::Error::from)?;
    parse_buffer(&bytes).map_err(crate::Error::from)
}

/// Write a whole [`Save`] as exactly 131,072 bytes to a stream.
pub fn write_save(save: &Save, stream: &mut impl ByteStream) -> crate::Result<()> {
    let buf = write_buffer(save).map_err(crate::Error::from)?;
    stream.write_all_at(&buf).map_err(crate::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(save: &Save) -> Save {
        let mut cursor = Cursor::new(Vec::new());
        write_save(save, &mut cursor).unwrap();
        cursor.seek_abs(0).unwrap();
        read_save(&mut cursor).unwrap()
    }

    #[test]
    fn empty_save_round_trips() {
        let save = Save::empty(12);
        let decoded = round_trip(&save);
        assert_eq!(decoded.active_project, None);
        assert!(decoded.projects.iter().all(|p| !p.is_allocated()));
        assert_eq!(decoded.song, save.song);
    }

    #[test]
    fn one_project_round_trips() {
        let mut save = Save::empty(12);
        let mut song = SongImage::new(12);
        song.meta.tempo = 140;
        save.assign_song(0, Name::from_str_lossy("MYSONG"), 3, song);
        save.active_project = Some(0);

        let decoded = round_trip(&save);
        assert_eq!(decoded.active_project, Some(0));
        assert!(decoded.projects[0].is_allocated());
        assert_eq!(decoded.projects[0].name.display(), "MYSONG");
        assert_eq!(decoded.projects[0].version, 3);
        assert_eq!(decoded.projects[0].song.as_ref().unwrap().meta.tempo, 140);
        assert!(!decoded.projects[1].is_allocated());
    }

    #[test]
    fn two_projects_get_first_fit_contiguous_blocks() {
        let mut save = Save::empty(12);
        let mut song_a = SongImage::new(12);
        song_a.meta.tempo = 1; // no compressible runs to speak of either way
        let mut song_b = SongImage::new(12);
        song_b.meta.tempo = 2;
        save.assign_song(0, Name::from_str_lossy("A"), 0, song_a);
        save.assign_song(1, Name::from_str_lossy("B"), 0, song_b);

        let mut cursor = Cursor::new(Vec::new());
        write_save(&save, &mut cursor).unwrap();
        let bytes = cursor.into_inner();
        let owner_table = &bytes[OWNER_TABLE_OFFSET..OWNER_TABLE_OFFSET + OWNER_TABLE_LEN];
        assert_eq!(owner_table[0], 0);
        let first_b = owner_table.iter().position(|b| *b == 1).unwrap();
        assert!(owner_table[..first_b].iter().all(|b| *b == 0));
    }

    #[test]
    fn clear_project_drops_song_and_active() {
        let mut save = Save::empty(12);
        save.assign_song(0, Name::from_str_lossy("X"), 0, SongImage::new(12));
        save.active_project = Some(0);
        save.clear_project(0);
        assert!(!save.is_allocated(0));
        assert_eq!(save.active_project, None);
    }

    #[test]
    fn bad_init_marker_fails() {
        let save = Save::empty(12);
        let mut buf = write_buffer(&save).unwrap();
        buf[HEADER_OFFSET + HEADER_INIT_OFFSET] = b'X';
        let mut cursor = Cursor::new(buf);
        let err = read_save(&mut cursor).unwrap_err();
        assert!(err.is_format());
    }
}
