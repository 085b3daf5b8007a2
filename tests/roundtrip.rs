use huffzip::{
    compress_bytes, compress_file, decompress_bytes, decompress_file, BitReader, BitWriter,
    Frequencies, HuffmanError, Trie,
};
use proptest::prelude::*;
use std::fs;
use std::io;
use tempfile::tempdir;

#[test]
fn file_round_trip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("input.txt");
    let archive = dir.path().join("input.huff");
    let restored = dir.path().join("restored.txt");

    let text = "Huffman encoding is a greedy algorithm that builds optimal prefix codes. ".repeat(50);
    fs::write(&source, &text).unwrap();

    let stats = compress_file(&source, &archive).unwrap();
    assert_eq!(stats.original_len as usize, text.len());
    assert_eq!(fs::metadata(&archive).unwrap().len(), stats.encoded_len);
    assert!(stats.encoded_len < text.len() as u64);

    let len = decompress_file(&archive, &restored).unwrap();
    assert_eq!(len as usize, text.len());
    assert_eq!(fs::read_to_string(&restored).unwrap(), text);
    // input left untouched
    assert_eq!(fs::read_to_string(&source).unwrap(), text);
}

#[test]
fn empty_file_round_trip() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("empty");
    let archive = dir.path().join("empty.huff");
    let restored = dir.path().join("empty.out");
    fs::write(&source, b"").unwrap();

    let stats = compress_file(&source, &archive).unwrap();
    assert_eq!(stats.original_len, 0);
    assert_eq!(decompress_file(&archive, &restored).unwrap(), 0);
    assert!(fs::read(&restored).unwrap().is_empty());
}

#[test]
fn overwrites_existing_target() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("in");
    let archive = dir.path().join("out");
    fs::write(&source, b"Z").unwrap();
    fs::write(&archive, vec![0xaa; 1000]).unwrap();

    compress_file(&source, &archive).unwrap();
    assert_eq!(fs::read(&archive).unwrap().len(), 7);
}

#[test]
fn missing_source_is_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let target = dir.path().join("target");

    match compress_file(&missing, &target) {
        Err(HuffmanError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("unexpected {:?}", other),
    }
    assert!(!target.exists());

    match decompress_file(&missing, &target) {
        Err(HuffmanError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn garbage_archive_fails_cleanly() {
    // a lone leaf root
    assert!(decompress_bytes(&[0xff; 3]).unwrap_err().is_corrupt());
    // unbounded internal nodes
    assert!(decompress_bytes(&[0x00; 64]).unwrap_err().is_corrupt());
    assert!(decompress_bytes(&[]).unwrap_err().is_corrupt());
}

#[derive(Debug, Clone)]
enum Item {
    Bit(bool),
    Byte(u8),
    Word(u32),
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        any::<bool>().prop_map(Item::Bit),
        any::<u8>().prop_map(Item::Byte),
        any::<u32>().prop_map(Item::Word),
    ]
}

proptest! {
    #[test]
    fn bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let archive = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&archive).unwrap(), data);
    }

    #[test]
    fn skewed_bytes_round_trip(data in proptest::collection::vec(0u8..4, 0..4096)) {
        let archive = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&archive).unwrap(), data);
    }

    #[test]
    fn bit_stream_round_trip(items in proptest::collection::vec(item(), 0..256)) {
        let mut w = BitWriter::new(Vec::new());
        for it in &items {
            match it {
                Item::Bit(b) => w.write_bit(*b).unwrap(),
                Item::Byte(b) => w.write_byte(*b).unwrap(),
                Item::Word(x) => w.write_u32(*x).unwrap(),
            }
        }
        let bytes = w.close().unwrap();

        let mut r = BitReader::new(&bytes[..]).unwrap();
        for it in &items {
            match it {
                Item::Bit(b) => prop_assert_eq!(r.read_bit().unwrap(), *b),
                Item::Byte(b) => prop_assert_eq!(r.read_byte().unwrap(), *b),
                Item::Word(x) => prop_assert_eq!(r.read_u32().unwrap(), *x),
            }
        }
        prop_assert!(!r.overran());
    }

    #[test]
    fn trie_codec_round_trip(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let trie = Trie::from_frequencies(&Frequencies::from_bytes(&data));
        prop_assert!(trie.leaf_count() >= 2);

        let mut w = BitWriter::new(Vec::new());
        trie.write_to(&mut w).unwrap();
        let bytes = w.close().unwrap();

        let mut r = BitReader::new(&bytes[..]).unwrap();
        prop_assert_eq!(Trie::read_from(&mut r).unwrap(), trie);
    }

    #[test]
    fn codes_are_prefix_free(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let table = Trie::from_frequencies(&Frequencies::from_bytes(&data)).code_table();
        for (a, code_a) in table.iter() {
            prop_assert!(!code_a.is_empty());
            for (b, code_b) in table.iter() {
                if a != b {
                    prop_assert!(!code_b.starts_with(code_a));
                }
            }
        }
    }
}
