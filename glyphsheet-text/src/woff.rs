//! WOFF container unwrapping.
//!
//! WOFF 1.0 files are rebuilt into a plain sfnt (zlib tables inflated,
//! table records re-laid with 4-byte alignment) so the outline parser can
//! read them. WOFF2 (Brotli stream plus transformed glyph tables) is decoded
//! by `wuff`.

use crate::error::{Result, SheetError};

const WOFF_SIGNATURE: u32 = u32::from_be_bytes(*b"wOFF");
const WOFF2_SIGNATURE: u32 = u32::from_be_bytes(*b"wOF2");
const HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const SFNT_ENTRY_LEN: usize = 16;

/// One table directory entry of a WOFF file.
struct WoffTable {
    tag: u32,
    offset: usize,
    comp_length: usize,
    orig_length: usize,
    checksum: u32,
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| SheetError::Woff(format!("truncated at byte {at}")))
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| SheetError::Woff(format!("truncated at byte {at}")))
}

/// Return sfnt bytes for `data`: unchanged unless it is a WOFF container.
pub fn to_sfnt(data: Vec<u8>) -> Result<Vec<u8>> {
    match read_u32(&data, 0).ok() {
        Some(WOFF_SIGNATURE) => unwrap_woff(&data),
        Some(WOFF2_SIGNATURE) => {
            wuff::decompress_woff2(&data).map_err(|e| SheetError::Woff(format!("WOFF2 decode failed: {e:?}")))
        }
        _ => Ok(data),
    }
}

fn unwrap_woff(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_LEN {
        return Err(SheetError::Woff("header truncated".into()));
    }
    let flavor = read_u32(data, 4)?;
    let num_tables = read_u16(data, 12)? as usize;

    let mut tables = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let at = HEADER_LEN + i * WOFF_ENTRY_LEN;
        tables.push(WoffTable {
            tag: read_u32(data, at)?,
            offset: read_u32(data, at + 4)? as usize,
            comp_length: read_u32(data, at + 8)? as usize,
            orig_length: read_u32(data, at + 12)? as usize,
            checksum: read_u32(data, at + 16)?,
        });
    }
    tables.sort_by_key(|t| t.tag);

    // sfnt offset table.
    let mut out = Vec::new();
    let pow2 = if num_tables == 0 { 0 } else { 1usize << num_tables.ilog2() };
    let search_range = pow2 * SFNT_ENTRY_LEN;
    let entry_selector = if pow2 == 0 { 0 } else { pow2.ilog2() as usize };
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&(num_tables as u16).to_be_bytes());
    out.extend_from_slice(&(search_range as u16).to_be_bytes());
    out.extend_from_slice(&(entry_selector as u16).to_be_bytes());
    out.extend_from_slice(&((num_tables * SFNT_ENTRY_LEN - search_range) as u16).to_be_bytes());

    let mut bodies = Vec::with_capacity(num_tables);
    for table in &tables {
        let raw = data
            .get(table.offset..table.offset + table.comp_length)
            .ok_or_else(|| SheetError::Woff(format!("table {} out of bounds", tag_name(table.tag))))?;
        let body = if table.comp_length < table.orig_length {
            miniz_oxide::inflate::decompress_to_vec_zlib(raw).map_err(|e| {
                SheetError::Woff(format!("table {}: inflate failed: {e:?}", tag_name(table.tag)))
            })?
        } else {
            raw.to_vec()
        };
        if body.len() != table.orig_length {
            return Err(SheetError::Woff(format!(
                "table {}: expected {} bytes, got {}",
                tag_name(table.tag),
                table.orig_length,
                body.len()
            )));
        }
        bodies.push(body);
    }

    let mut offset = 12 + num_tables * SFNT_ENTRY_LEN;
    for (table, body) in tables.iter().zip(&bodies) {
        out.extend_from_slice(&table.tag.to_be_bytes());
        out.extend_from_slice(&table.checksum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(body.len() as u32).to_be_bytes());
        offset += body.len().next_multiple_of(4);
    }
    for body in &bodies {
        out.extend_from_slice(body);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    Ok(out)
}

fn tag_name(tag: u32) -> String {
    String::from_utf8_lossy(&tag.to_be_bytes()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a WOFF file holding the given (tag, body, compress) tables.
    fn build_woff(tables: &[(&[u8; 4], &[u8], bool)]) -> Vec<u8> {
        let mut header = Vec::new();
        header.extend_from_slice(b"wOFF");
        header.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        header.extend_from_slice(&0u32.to_be_bytes()); // length, unchecked
        header.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        header.resize(HEADER_LEN, 0);

        let mut dir = Vec::new();
        let mut payload = Vec::new();
        let base = HEADER_LEN + tables.len() * WOFF_ENTRY_LEN;
        for (tag, body, compress) in tables {
            let stored = if *compress {
                miniz_oxide::deflate::compress_to_vec_zlib(body, 6)
            } else {
                body.to_vec()
            };
            dir.extend_from_slice(*tag);
            dir.extend_from_slice(&((base + payload.len()) as u32).to_be_bytes());
            dir.extend_from_slice(&(stored.len() as u32).to_be_bytes());
            dir.extend_from_slice(&(body.len() as u32).to_be_bytes());
            dir.extend_from_slice(&0xABCD_0123u32.to_be_bytes());
            payload.extend_from_slice(&stored);
        }
        [header, dir, payload].concat()
    }

    #[test]
    fn test_plain_sfnt_passes_through() {
        let data = vec![0, 1, 0, 0, 9, 9];
        assert_eq!(to_sfnt(data.clone()).unwrap(), data);
    }

    #[test]
    fn test_malformed_woff2_is_reported() {
        let err = to_sfnt(b"wOF2rest-of-file".to_vec()).unwrap_err();
        assert!(matches!(err, SheetError::Woff(_)));
        assert!(err.to_string().contains("WOFF2"));
    }

    #[test]
    fn test_unwrap_rebuilds_sfnt() {
        let long = vec![7u8; 300];
        let woff = build_woff(&[(b"head", &b"abcde"[..], false), (b"cmap", &long[..], true)]);
        let sfnt = to_sfnt(woff).unwrap();

        assert_eq!(&sfnt[0..4], &0x0001_0000u32.to_be_bytes());
        assert_eq!(read_u16(&sfnt, 4).unwrap(), 2);
        assert_eq!(read_u16(&sfnt, 6).unwrap(), 32); // searchRange
        assert_eq!(read_u16(&sfnt, 8).unwrap(), 1); // entrySelector
        assert_eq!(read_u16(&sfnt, 10).unwrap(), 0); // rangeShift

        // Records are sorted by tag: cmap before head.
        assert_eq!(&sfnt[12..16], b"cmap");
        let cmap_offset = read_u32(&sfnt, 20).unwrap() as usize;
        let cmap_len = read_u32(&sfnt, 24).unwrap() as usize;
        assert_eq!(cmap_offset, 44);
        assert_eq!(&sfnt[cmap_offset..cmap_offset + cmap_len], long.as_slice());

        assert_eq!(&sfnt[28..32], b"head");
        let head_offset = read_u32(&sfnt, 36).unwrap() as usize;
        assert_eq!(head_offset % 4, 0);
        assert_eq!(&sfnt[head_offset..head_offset + 5], b"abcde");
        assert_eq!(sfnt.len() % 4, 0);
    }

    #[test]
    fn test_truncated_woff() {
        assert!(matches!(to_sfnt(b"wOFF\0\0".to_vec()), Err(SheetError::Woff(_))));
        let mut woff = build_woff(&[(b"head", &b"abcd"[..], false)]);
        woff.truncate(woff.len() - 2);
        assert!(matches!(to_sfnt(woff), Err(SheetError::Woff(_))));
    }
}
