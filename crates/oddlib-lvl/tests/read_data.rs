use byteorder::{LittleEndian, WriteBytesExt};
use oddlib_lvl::{LvlArchive, SECTOR_SIZE};
use proptest::prelude::*;

/// Build a single-file archive holding the given chunk payloads.
fn build_archive(payloads: &[Vec<u8>]) -> Vec<u8> {
    let mut file = Vec::new();
    for (id, payload) in payloads.iter().enumerate() {
        file.write_u32::<LittleEndian>((payload.len() + 16) as u32).unwrap();
        file.write_u32::<LittleEndian>(1).unwrap();
        file.extend_from_slice(b"Anim");
        file.write_u32::<LittleEndian>(id as u32).unwrap();
        file.extend_from_slice(payload);
    }
    file.write_u32::<LittleEndian>(16).unwrap();
    file.write_u32::<LittleEndian>(0).unwrap();
    file.extend_from_slice(b"End!");
    file.write_u32::<LittleEndian>(0).unwrap();

    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(SECTOR_SIZE as u32).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();
    out.extend_from_slice(b"Indx");
    out.write_u32::<LittleEndian>(0).unwrap();
    out.write_u32::<LittleEndian>(1).unwrap();
    out.extend_from_slice(&[0u8; 12]);

    let mut name = [0u8; 12];
    name[..8].copy_from_slice(b"TEST.BAN");
    out.extend_from_slice(&name);
    out.write_u32::<LittleEndian>(1).unwrap();
    out.write_u32::<LittleEndian>(file.len().div_ceil(SECTOR_SIZE) as u32)
        .unwrap();
    out.write_u32::<LittleEndian>(file.len() as u32).unwrap();

    out.resize(SECTOR_SIZE, 0);
    out.extend_from_slice(&file);
    out
}

proptest! {
    #[test]
    fn prop_read_data_is_exact_and_repeatable(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..256), 0..16)
    ) {
        let archive = LvlArchive::from_bytes(build_archive(&payloads)).unwrap();
        let file = archive.file_by_name("test.ban").unwrap();
        prop_assert_eq!(file.chunk_count(), payloads.len());

        for (chunk, expected) in file.chunks().iter().zip(&payloads) {
            let first = archive.read_data(chunk).unwrap();
            let second = archive.read_data(chunk).unwrap();
            prop_assert_eq!(first.len(), chunk.len());
            prop_assert_eq!(&first, expected);
            prop_assert_eq!(first, second);
        }
    }
}
