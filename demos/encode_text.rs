use huffzip::code::render;
use huffzip::{compress_bytes, decompress_bytes, Frequencies, Trie};

fn main() -> huffzip::Result<()> {
    let s = String::from("Hello my name is Sam!");

    let tree = Trie::from_frequencies(&Frequencies::from_bytes(s.as_bytes()));
    for (symbol, code) in tree.code_table().iter() {
        println!("{:?} -> {}", symbol as char, render(code));
    }

    let archive = compress_bytes(s.as_bytes())?;
    let dec = String::from_utf8(decompress_bytes(&archive)?);

    println!("{} bytes -> {} bytes: {:?}", s.len(), archive.len(), dec);
    Ok(())
}
