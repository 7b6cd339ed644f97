//! Serialize, compress and seal a buffer, then unwrap it again.

use tlvprims::compress::{deflate, inflate};
use tlvprims::crypto::{decrypt, encrypt};
use tlvprims::wire::{Tag, TlvReader, TlvWriter};

const CHUNK: usize = 512;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(1)?, &b"user@example.com"[..])
        .write(Tag::new(2)?, "session-token-0123456789".repeat(8).into_bytes());

    let wire = writer.serialize()?;
    let compressed = deflate(&wire, CHUNK)?;
    let sealed = encrypt(&compressed, "correct horse battery staple")?;
    println!(
        "wire {} bytes, compressed {} bytes, sealed {} bytes",
        wire.len(),
        compressed.len(),
        sealed.len()
    );

    let opened = decrypt(&sealed, "correct horse battery staple")?;
    let restored = inflate(&opened, CHUNK)?;

    let mut reader = TlvReader::new();
    reader.read(&restored);
    let email = reader.parse(Tag::new(1)?)?.expect("tag 1 present");
    println!("tag 1 = {}", String::from_utf8_lossy(&email));

    Ok(())
}
