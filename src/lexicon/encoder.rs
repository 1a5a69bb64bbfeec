use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::lexicon::decoder::scan_records;
use crate::lexicon::error::{LexError, Result};
use crate::lexicon::header::{
    new_file_header, BLOB_START_POS, FIXED_HEADER_LEN, PHRASE_COUNT_POS, TABLE_BASE, TOTAL_LEN_POS,
};
use crate::lexicon::phrase::PhraseEntry;
use crate::lexicon::record::{build_record_header, RawRecord, DEFAULT_TAIL};
use crate::util::put_u32_le;
use crate::util::string::utf16_le_bytes;

/// Merge `items` into the lexicon at `path`, replacing every existing record
/// whose pinyin bytes match a candidate's (regardless of slot), and rewrite
/// the whole file. Returns how many existing records were replaced.
///
/// A missing file is initialized; any other I/O failure propagates. The new
/// image is built completely in memory and swapped in with one rename, so a
/// crash mid-write leaves the previous file intact.
pub fn upsert_phrases(path: &Path, items: &[PhraseEntry]) -> Result<usize> {
    let current = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => new_file_header().to_vec(),
        Err(e) => return Err(e.into()),
    };

    let scan = scan_records(&current);
    // tail 字节语义未知：只透传，绝不重算
    let tail = scan.tail.unwrap_or(DEFAULT_TAIL);
    let mut records = scan.live();

    let incoming: Vec<Vec<u8>> = items.iter().map(|it| utf16_le_bytes(&it.pinyin)).collect();
    let kept_before = records.len();
    records.retain(|r| !incoming.iter().any(|p| p == &r.pinyin));
    let overwritten = kept_before - records.len();

    for (item, pinyin) in items.iter().zip(incoming) {
        let header = build_record_header(pinyin.len(), item.slot, tail);
        records.push(RawRecord {
            header,
            pinyin,
            text: utf16_le_bytes(&item.text),
        });
    }
    // byte order, then length for prefix ties; keeps the file layout stable
    records.sort_by(|a, b| a.pinyin.cmp(&b.pinyin));

    let image = build_image(&current, &records);
    persist(path, &image)?;
    debug!(
        records = records.len(),
        overwritten,
        bytes = image.len(),
        "lexicon rewritten"
    );
    Ok(overwritten)
}

/// Assemble the complete file image: the prior fixed header verbatim
/// (zero-padded if the old file was shorter), the offset table, the record
/// blob, and finally the three patched header fields. Patching happens after
/// the blob so the counters always describe the final record set.
pub(crate) fn build_image(current: &[u8], records: &[RawRecord]) -> Vec<u8> {
    let mut image = match current.get(..FIXED_HEADER_LEN) {
        Some(head) => head.to_vec(),
        None => {
            let mut head = current.to_vec();
            head.resize(FIXED_HEADER_LEN, 0);
            head
        }
    };

    let mut end = 0u32;
    for r in &records[..records.len().saturating_sub(1)] {
        end += r.encoded_len() as u32;
        image.extend_from_slice(&end.to_le_bytes());
    }
    for r in records {
        r.write_to(&mut image);
    }

    let count = records.len() as u32;
    let total = image.len() as u32;
    put_u32_le(&mut image, BLOB_START_POS, TABLE_BASE + 4 * count);
    put_u32_le(&mut image, TOTAL_LEN_POS, total);
    put_u32_le(&mut image, PHRASE_COUNT_POS, count);
    image
}

fn persist(path: &Path, image: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(image)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| LexError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::header::{parse_header, LEX_MAGIC};

    fn rec(pinyin: &str, slot: u32, text: &str) -> RawRecord {
        let py = utf16_le_bytes(pinyin);
        RawRecord {
            header: build_record_header(py.len(), slot, DEFAULT_TAIL),
            pinyin: py,
            text: utf16_le_bytes(text),
        }
    }

    #[test]
    fn image_counters_describe_the_record_set() {
        let records = [rec("hao", 2, "好"), rec("ni", 1, "你")];
        let image = build_image(&new_file_header(), &records);

        let (_, header) = parse_header(&image).unwrap();
        assert_eq!(&header.magic, LEX_MAGIC);
        assert_eq!(header.phrase_count, 2);
        assert_eq!(header.blob_offset, 0x40 + 4 * 2);
        assert_eq!(header.total_len as usize, image.len());

        // one table entry: end of record 0
        let table = &image[FIXED_HEADER_LEN..FIXED_HEADER_LEN + 4];
        let end0 = u32::from_le_bytes([table[0], table[1], table[2], table[3]]);
        assert_eq!(end0 as usize, records[0].encoded_len());
    }

    #[test]
    fn empty_record_set_still_patches_header() {
        let image = build_image(&new_file_header(), &[]);
        assert_eq!(image.len(), FIXED_HEADER_LEN);
        let (_, header) = parse_header(&image).unwrap();
        assert_eq!(header.phrase_count, 0);
        assert_eq!(header.blob_offset, 0x40);
        assert_eq!(header.total_len as usize, FIXED_HEADER_LEN);
    }

    #[test]
    fn short_prior_file_is_zero_padded() {
        let image = build_image(&[0xAAu8; 10], &[rec("ni", 1, "你")]);
        assert_eq!(&image[..10], &[0xAAu8; 10]);
        assert_eq!(image[10], 0);
        let (_, header) = parse_header(&image).unwrap();
        assert_eq!(header.phrase_count, 1);
    }
}
