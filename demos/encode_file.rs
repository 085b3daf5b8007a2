use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fp = PathBuf::from(
        env::args()
            .nth(1)
            .ok_or("Please provide path to input file as first argument.")?,
    );

    let encoded = fp.with_extension("huff");
    let decoded = fp.with_extension("decoded");

    // encode scope - save to file
    {
        let stats = huffzip::compress_file(&fp, &encoded)?;
        println!("{}", stats);
    }

    // decode scope - read from file
    {
        huffzip::decompress_file(&encoded, &decoded)?;
    }

    if fs::read(&fp)? != fs::read(&decoded)? {
        return Err("decoded file differs from the input".into());
    }
    println!("round trip ok: {}", decoded.display());
    Ok(())
}
