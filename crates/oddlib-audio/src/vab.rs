//! VAB sound bank headers.
//!
//! A VAB header describes up to 128 programs (instruments), each with up to
//! 16 tones that map a key range onto one sample (VAG). Sample data is
//! stored separately; the header only records each sample's size.

use log::debug;
use oddlib_common::le::{I16, U16, U32};
use oddlib_common::ByteCursor;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{Error, Result};

/// Magic at the start of every VAB header.
pub const VAB_MAGIC: [u8; 4] = *b"pBAV";

/// Number of program slots in every header.
pub const MAX_PROGRAMS: usize = 128;

/// Tone slots stored for each program that has tones.
pub const TONES_PER_PROGRAM: usize = 16;

/// Entries in the sample size table.
const VAG_TABLE_SIZE: usize = 256;

/// Bank header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct VabHeader {
    pub form: [u8; 4],
    pub version: U32,
    pub id: U32,
    pub file_size: U32,
    pub reserved0: U16,
    /// Number of programs with tones.
    pub program_count: U16,
    pub tone_count: U16,
    /// Number of samples.
    pub vag_count: U16,
    pub master_volume: u8,
    pub master_pan: u8,
    pub attr1: u8,
    pub attr2: u8,
    pub reserved1: U32,
}

/// Attributes of one program.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ProgramAttributes {
    pub tone_count: u8,
    pub volume: u8,
    pub priority: u8,
    /// Mode 4 enables reverb.
    pub mode: u8,
    pub pan: u8,
    pub reserved0: u8,
    pub attr: I16,
    pub reserved1: U32,
    pub reserved2: U32,
}

/// Attributes of one tone.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ToneAttributes {
    pub priority: u8,
    pub mode: u8,
    pub volume: u8,
    pub pan: u8,
    /// Root key.
    pub center: u8,
    /// Fine tuning in cents.
    pub shift: u8,
    pub min: u8,
    pub max: u8,
    pub vibrato_width: u8,
    pub vibrato_time: u8,
    pub portamento_width: u8,
    pub portamento_time: u8,
    pub pitch_bend_min: u8,
    pub pitch_bend_max: u8,
    pub reserved1: u8,
    pub reserved2: u8,
    pub adsr1: U16,
    pub adsr2: U16,
    pub program: I16,
    /// 1-based sample index; 0 means no sample.
    pub vag: I16,
    pub reserved: [I16; 4],
}

/// A parsed VAB header.
#[derive(Debug, Clone)]
pub struct Vab {
    pub header: VabHeader,
    /// All 128 program slots.
    pub programs: Vec<ProgramAttributes>,
    /// Tones of each program slot; empty for programs without tones.
    pub tones: Vec<Vec<ToneAttributes>>,
    /// Byte size of each sample, `vag_count` entries.
    pub sample_sizes: Vec<usize>,
}

impl Vab {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let header: VabHeader = cursor.read_struct()?;
        if header.form != VAB_MAGIC {
            return Err(Error::InvalidMagic(header.form));
        }

        let programs = (0..MAX_PROGRAMS)
            .map(|_| cursor.read_struct::<ProgramAttributes>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Tone blocks are stored only for programs that have tones, in
        // program order, up to the header's program count
        let stored_blocks = header.program_count.get() as usize;
        let mut tones = Vec::with_capacity(MAX_PROGRAMS);
        let mut blocks_read = 0;
        for program in &programs {
            if program.tone_count == 0 || blocks_read == stored_blocks {
                tones.push(Vec::new());
                continue;
            }

            let mut block = Vec::with_capacity(TONES_PER_PROGRAM);
            for _ in 0..TONES_PER_PROGRAM {
                block.push(cursor.read_struct::<ToneAttributes>()?);
            }
            block.truncate(program.tone_count as usize);
            tones.push(block);
            blocks_read += 1;
        }

        let mut vag_table = [0u16; VAG_TABLE_SIZE];
        for entry in &mut vag_table {
            *entry = cursor.read_u16()?;
        }

        // Entry 0 is reserved; sample n uses entry n
        let vag_count = (header.vag_count.get() as usize).min(VAG_TABLE_SIZE - 1);
        let sample_sizes = vag_table[1..=vag_count]
            .iter()
            .map(|&size| (size as usize) << 3)
            .collect();

        debug!(
            "VAB {}: {} tone blocks, {} samples",
            header.id.get(),
            blocks_read,
            vag_count
        );

        Ok(Self {
            header,
            programs,
            tones,
            sample_sizes,
        })
    }

    /// Cut a sample body into per-sample blocks using the size table.
    pub fn split_samples<'a>(&self, body: &'a [u8]) -> Result<Vec<&'a [u8]>> {
        let mut cursor = ByteCursor::new(body);
        self.sample_sizes
            .iter()
            .map(|&size| Ok(cursor.read_bytes(size)?))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct TestTone {
        pub volume: u8,
        pub pan: u8,
        pub shift: u8,
        pub adsr1: u16,
        pub vag: i16,
    }

    /// Build a VAB with the given programs (slot, mode, tones) and sample sizes.
    pub(crate) fn build_vab(programs: &[(usize, u8, Vec<TestTone>)], sample_sizes: &[u16]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"pBAV");
        out.extend_from_slice(&7u32.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&(programs.len() as u16).to_le_bytes());
        let tone_total: usize = programs.iter().map(|p| p.2.len()).sum();
        out.extend_from_slice(&(tone_total as u16).to_le_bytes());
        out.extend_from_slice(&(sample_sizes.len() as u16).to_le_bytes());
        out.extend_from_slice(&[127, 64, 0, 0]);
        out.extend_from_slice(&0u32.to_le_bytes());
        assert_eq!(out.len(), 32);

        for slot in 0..MAX_PROGRAMS {
            let mut record = [0u8; 16];
            if let Some((_, mode, tones)) = programs.iter().find(|p| p.0 == slot) {
                record[0] = tones.len() as u8;
                record[3] = *mode;
            }
            out.extend_from_slice(&record);
        }

        let mut sorted: Vec<_> = programs.iter().collect();
        sorted.sort_by_key(|p| p.0);
        for (_, _, tones) in sorted {
            for t in 0..TONES_PER_PROGRAM {
                let mut record = [0u8; 32];
                if let Some(tone) = tones.get(t) {
                    record[2] = tone.volume;
                    record[3] = tone.pan;
                    record[4] = 60;
                    record[5] = tone.shift;
                    record[6] = 0;
                    record[7] = 127;
                    record[16..18].copy_from_slice(&tone.adsr1.to_le_bytes());
                    record[22..24].copy_from_slice(&tone.vag.to_le_bytes());
                }
                out.extend_from_slice(&record);
            }
        }

        let mut table = [0u16; VAG_TABLE_SIZE];
        for (i, &size) in sample_sizes.iter().enumerate() {
            table[i + 1] = size;
        }
        for entry in table {
            out.extend_from_slice(&entry.to_le_bytes());
        }
        out
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(std::mem::size_of::<VabHeader>(), 32);
        assert_eq!(std::mem::size_of::<ProgramAttributes>(), 16);
        assert_eq!(std::mem::size_of::<ToneAttributes>(), 32);
    }

    #[test]
    fn test_parse() {
        let tone = |vag| TestTone {
            volume: 100,
            pan: 64,
            shift: 50,
            adsr1: 0,
            vag,
        };
        let data = build_vab(
            &[(2, 0, vec![tone(1), tone(2)]), (40, 4, vec![tone(2)])],
            &[2, 4],
        );
        let vab = Vab::parse(&data).unwrap();

        assert_eq!(vab.programs.len(), MAX_PROGRAMS);
        assert_eq!(vab.tones[2].len(), 2);
        assert_eq!(vab.tones[40].len(), 1);
        assert!(vab.tones[0].is_empty());
        assert_eq!(vab.tones[2][1].vag.get(), 2);
        assert_eq!(vab.programs[40].mode, 4);
        assert_eq!(vab.sample_sizes, vec![16, 32]);

        let body: Vec<u8> = (0..48).collect();
        let blocks = vab.split_samples(&body).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1][0], 16);
        assert!(vab.split_samples(&body[..40]).is_err());
    }

    #[test]
    fn test_bad_magic() {
        let mut data = build_vab(&[], &[]);
        data[0] = b'X';
        assert!(matches!(Vab::parse(&data), Err(Error::InvalidMagic(_))));
    }
}
