#![cfg(all(feature = "compress", feature = "crypto"))]

use bytes::BytesMut;
use tlvprims::compress::{deflate, inflate};
use tlvprims::crypto::{decrypt, encrypt};
use tlvprims::wire::{encode_record, Tag, TlvReader, TlvWriter, DEFAULT_MAX_VALUE};

const CHUNK: usize = 512;

#[test]
fn compressed_buffer_roundtrip() {
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(1).unwrap(), "repetitive ".repeat(100).into_bytes())
        .write(Tag::new(70_000).unwrap(), &b"wide tag"[..]);

    let wire = writer.serialize().unwrap();
    let compressed = deflate(&wire, CHUNK).unwrap();
    assert!(compressed.len() < wire.len());

    let restored = inflate(&compressed, CHUNK).unwrap();
    assert_eq!(restored, wire.as_ref());

    let mut reader = TlvReader::new();
    reader.read(&restored);
    assert_eq!(
        reader
            .parse(Tag::new(70_000).unwrap())
            .unwrap()
            .unwrap()
            .as_ref(),
        b"wide tag"
    );
}

#[test]
fn sealed_buffer_roundtrip() {
    let mut writer = TlvWriter::new();
    writer.write(Tag::new(7).unwrap(), &b"secret payload"[..]);
    let wire = writer.serialize().unwrap();

    let sealed = encrypt(&wire, "passphrase").unwrap();
    assert_ne!(sealed.as_slice(), wire.as_ref());

    let opened = decrypt(&sealed, "passphrase").unwrap();
    let mut reader = TlvReader::new();
    reader.read(&opened);
    assert_eq!(
        reader.parse(Tag::new(7).unwrap()).unwrap().unwrap().as_ref(),
        b"secret payload"
    );
}

#[test]
fn compress_then_seal_pipeline() {
    let mut writer = TlvWriter::new();
    for tag in 1u32..=40 {
        writer.write(
            Tag::new(tag).unwrap(),
            format!("value-{tag}-{}", "x".repeat(64)).into_bytes(),
        );
    }
    let wire = writer.serialize().unwrap();

    let sealed = encrypt(&deflate(&wire, CHUNK).unwrap(), "hunter2").unwrap();
    let restored = inflate(&decrypt(&sealed, "hunter2").unwrap(), CHUNK).unwrap();

    let mut reader = TlvReader::new();
    reader.read(&restored);
    let map = reader.parse_all().unwrap();
    assert_eq!(map.len(), 40);
    assert!(map[&17].starts_with(b"value-17-"));
}

#[test]
fn wire_level_duplicates_bypass_writer_overwrite() {
    // Two records with the same tag written directly onto the buffer:
    // the first one wins on read, unlike the writer's map semantics.
    let mut wire = BytesMut::new();
    encode_record(Tag::new(1).unwrap(), b"A", &mut wire).unwrap();
    encode_record(Tag::new(1).unwrap(), b"B", &mut wire).unwrap();

    let mut reader = TlvReader::new();
    reader.read(&wire);

    assert_eq!(
        reader.parse(Tag::new(1).unwrap()).unwrap().unwrap().as_ref(),
        b"A"
    );
    let map = reader.parse_all().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&1].as_ref(), b"A");

    // The writer overwrites instead.
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(1).unwrap(), &b"A"[..])
        .write(Tag::new(1).unwrap(), &b"B"[..]);
    let mut reread = TlvReader::new();
    reread.read(&writer.serialize().unwrap());
    assert_eq!(
        reread.parse(Tag::new(1).unwrap()).unwrap().unwrap().as_ref(),
        b"B"
    );
}

#[test]
fn truncated_pipeline_output_keeps_prior_records() {
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(1).unwrap(), &b"complete"[..])
        .write(Tag::new(2).unwrap(), &b"will be cut"[..]);
    let wire = writer.serialize().unwrap();

    let mut reader = TlvReader::new();
    reader.read(&wire[..wire.len() - 4]);

    let map = reader.parse_all().unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&1].as_ref(), b"complete");
}

#[test]
fn decode_record_streams_in_wire_order() {
    let mut writer = TlvWriter::new();
    writer
        .write(Tag::new(9).unwrap(), &b"nine"[..])
        .write(Tag::new(3).unwrap(), &b"three"[..]);

    let mut scan = BytesMut::from(writer.serialize().unwrap().as_ref());
    let mut tags = Vec::new();
    while let Some(record) =
        tlvprims::wire::decode_record(&mut scan, DEFAULT_MAX_VALUE).unwrap()
    {
        tags.push(record.tag.value());
    }
    assert_eq!(tags, vec![9, 3]);
}
