//! The .vsmeta binary layout.
//!
//! A sidecar is a flat sequence of tag-length-value fields that the consumer
//! reads positionally, tag byte by tag byte. The field order below is
//! load-bearing: the consumer does not look fields up by name, so emitting
//! them in any other order produces a file it cannot parse. Everything here
//! is pure byte building: no I/O, no failure paths.
//!
//! Lengths and integers use a base-128 continuation encoding whose loop
//! condition is `> 128` rather than the conventional `> 127`. That threshold
//! was reverse-engineered from the consumer and is kept verbatim; see
//! [`write_length`].

use crate::asset::AssetBlob;
use crate::record::MovieRecord;

// Top-level field tags, in emission order.
const TAG_MEDIA_TYPE: u8 = 0x08;
const TAG_TITLE: u8 = 0x12;
const TAG_SORT_TITLE: u8 = 0x1A;
const TAG_TAGLINE: u8 = 0x22;
const TAG_YEAR: u8 = 0x28;
const TAG_RELEASE_DATE: u8 = 0x32;
const TAG_LOCKED: u8 = 0x38;
const TAG_PLOT: u8 = 0x42;
const TAG_CREDITS: u8 = 0x52;
const TAG_CLASSIFICATION: u8 = 0x5A;
const TAG_RATING: u8 = 0x60;
const TAG_POSTER: u8 = 0x8A;
const TAG_BACKDROP: u8 = 0xAA;

// Sub-tags inside the credits block, in emission order.
const SUB_TAG_ACTOR: u8 = 0x0A;
const SUB_TAG_DIRECTOR: u8 = 0x12;
const SUB_TAG_GENRE: u8 = 0x1A;
const SUB_TAG_WRITER: u8 = 0x22;

/// An asset's checksum field tag sits at a fixed offset from its data tag
/// (poster 0x8A -> 0x92, backdrop 0xAA -> 0xB2).
const CHECKSUM_TAG_OFFSET: u8 = 0x08;

/// Marker byte following TAG_MEDIA_TYPE, TAG_LOCKED and each asset tag.
const MARKER: u8 = 0x01;

/// Append a length in the format's base-128 continuation encoding.
///
/// Continuation bytes carry `value % 128` with the high bit set, lowest
/// group first. The loop condition is `> 128`, exactly as the consumer was
/// built against: a length of exactly 128 is emitted as the single byte
/// 0x80. That is one byte off from a conventional varint, and deliberately
/// so; compatibility here means byte-for-byte, bugs included.
pub fn write_length(buf: &mut Vec<u8>, len: usize) {
    write_varint(buf, len as u64);
}

/// Append an integer using the same continuation rule as lengths.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u64) {
    while value > 128 {
        buf.push((value % 128 + 128) as u8);
        value /= 128;
    }
    buf.push(value as u8);
}

/// Append a length-prefixed UTF-8 string, no terminator.
pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    write_bytes(buf, s.as_bytes());
}

/// Append a length-prefixed byte run.
pub fn write_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_length(buf, bytes.len());
    buf.extend_from_slice(bytes);
}

/// Assemble the credits block: actors, directors, genres, writers, in that
/// fixed sub-tag order, one entry per occurrence. No deduping, no
/// reordering. All lists empty yields an empty block, which the parent still
/// emits as a zero-length field.
pub fn group_credits(record: &MovieRecord) -> Vec<u8> {
    let mut block = Vec::new();
    for (sub_tag, names) in [
        (SUB_TAG_ACTOR, &record.actors),
        (SUB_TAG_DIRECTOR, &record.directors),
        (SUB_TAG_GENRE, &record.genres),
        (SUB_TAG_WRITER, &record.writers),
    ] {
        for name in names {
            block.push(sub_tag);
            write_string(&mut block, name);
        }
    }
    block
}

/// Sequential field builder. Each method appends one complete tagged field;
/// [`encode_vsmeta`] calls them in the contract's order and nothing else
/// decides placement.
struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn marker(&mut self, tag: u8) {
        self.buf.push(tag);
        self.buf.push(MARKER);
    }

    fn string(&mut self, tag: u8, value: &str) {
        self.buf.push(tag);
        write_string(&mut self.buf, value);
    }

    fn varint(&mut self, tag: u8, value: u64) {
        self.buf.push(tag);
        write_varint(&mut self.buf, value);
    }

    fn block(&mut self, tag: u8, payload: &[u8]) {
        self.buf.push(tag);
        write_bytes(&mut self.buf, payload);
    }

    /// Asset sub-message: data tag, marker, wrapped base64 text, then the
    /// checksum field at `tag + 8` with its own marker.
    fn asset(&mut self, tag: u8, blob: &AssetBlob) {
        self.marker(tag);
        write_string(&mut self.buf, &blob.text);
        self.marker(tag + CHECKSUM_TAG_OFFSET);
        write_string(&mut self.buf, &blob.checksum);
    }
}

/// Encode one record plus optional artwork into the final sidecar bytes.
///
/// Deterministic: the same inputs always produce identical output. Absent
/// assets are omitted entirely; their tags never appear.
pub fn encode_vsmeta(
    record: &MovieRecord,
    poster: Option<&AssetBlob>,
    backdrop: Option<&AssetBlob>,
) -> Vec<u8> {
    let credits = group_credits(record);

    let mut w = FieldWriter::new();
    w.marker(TAG_MEDIA_TYPE);
    w.string(TAG_TITLE, &record.title);
    w.string(TAG_SORT_TITLE, &record.sort_title);
    w.string(TAG_TAGLINE, &record.tagline);
    w.varint(TAG_YEAR, record.year);
    w.string(TAG_RELEASE_DATE, &record.release_date);
    w.marker(TAG_LOCKED);
    w.string(TAG_PLOT, &record.plot);
    w.block(TAG_CREDITS, &credits);
    w.string(TAG_CLASSIFICATION, &record.content_rating);
    w.varint(TAG_RATING, record.rating_tenths);
    if let Some(blob) = poster {
        w.asset(TAG_POSTER, blob);
    }
    if let Some(blob) = backdrop {
        w.asset(TAG_BACKDROP, blob);
    }
    w.buf
}
