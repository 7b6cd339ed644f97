//! Build a buffer with the batch writer, then read it back.

use tlvprims::wire::{Tag, TlvReader, TlvWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(1)?, &b"alpha"[..])
        .write(Tag::new(500)?, &b"beta"[..])
        .write_u32(Tag::new(70_000)?, 0xDEAD_BEEF);

    let wire = writer.serialize()?;
    println!("serialized {} records into {} bytes", writer.len(), wire.len());

    let mut reader = TlvReader::new();
    reader.read(&wire);
    for (tag, value) in reader.parse_all()? {
        println!("tag {tag}: {} value bytes", value.len());
    }

    Ok(())
}
