use crate::lexicon::header::parse_header;
use crate::lexicon::phrase::PhraseEntry;
use crate::lexicon::record::RawRecord;

/// Outcome of classifying one slice of the record blob. Kept as a tagged
/// value instead of a bare filter so `inspect` and the tests can count what
/// was skipped and why.
#[derive(Debug)]
pub enum ScannedRecord {
    Live(RawRecord),
    Deleted,
    Malformed(&'static str),
}

/// Raw scan of a lexicon buffer: one outcome per declared record, plus the
/// tail bytes learned from the first record long enough to carry them.
#[derive(Debug, Default)]
pub struct LexScan {
    pub records: Vec<ScannedRecord>,
    pub tail: Option<[u8; 2]>,
}

impl LexScan {
    pub fn live(self) -> Vec<RawRecord> {
        self.records
            .into_iter()
            .filter_map(|r| match r {
                ScannedRecord::Live(raw) => Some(raw),
                _ => None,
            })
            .collect()
    }
}

/// Walk the offset table and classify every record. Never fails: a buffer
/// too short for the header, a non-positive count, or a table extending past
/// the buffer all yield an empty scan, and any single bad record is marked
/// malformed without stopping the walk.
pub fn scan_records(data: &[u8]) -> LexScan {
    let mut scan = LexScan::default();

    let Ok((after_header, header)) = parse_header(data) else {
        return scan;
    };
    if header.phrase_count <= 0 {
        return scan;
    }
    let count = header.phrase_count as usize;

    // 偏移表只存前 count-1 条记录的结束位置，最后一条以 EOF 收尾
    let table_len = 4 * (count - 1);
    if after_header.len() < table_len {
        return scan;
    }
    let (table, blob) = after_header.split_at(table_len);

    let mut last: i64 = 0;
    for i in 0..count {
        let end: i64 = if i + 1 == count {
            blob.len() as i64
        } else {
            table_entry(table, i)
        };
        let start = last;
        last = end;

        match slice_range(blob, start, end) {
            Some(seg) => scan.records.push(RawRecord::classify(seg, &mut scan.tail)),
            None => scan
                .records
                .push(ScannedRecord::Malformed("record bounds out of range")),
        }
    }
    scan
}

/// Decode a full lexicon buffer into phrase entries, sorted by pinyin
/// (ordinal) then slot. Deleted and malformed records are skipped, as are
/// live records whose fields fail UTF-16 decoding or normalize to empty.
pub fn decode_phrases(data: &[u8]) -> Vec<PhraseEntry> {
    let mut entries: Vec<PhraseEntry> = scan_records(data)
        .live()
        .iter()
        .filter_map(PhraseEntry::from_raw)
        .collect();
    entries.sort_by(|a, b| a.pinyin.cmp(&b.pinyin).then(a.slot.cmp(&b.slot)));
    entries
}

fn table_entry(table: &[u8], i: usize) -> i64 {
    // bounds were checked against table_len, the signed read mirrors the host
    let b = &table[4 * i..4 * i + 4];
    i64::from(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn slice_range(blob: &[u8], start: i64, end: i64) -> Option<&[u8]> {
    if start < 0 || end < start {
        return None;
    }
    blob.get(start as usize..end as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::header::{new_file_header, PHRASE_COUNT_POS};
    use crate::lexicon::record::{build_record_header, DELETED_FLAG_POS};
    use crate::util::put_u32_le;
    use crate::util::string::utf16_le_bytes;

    fn record_bytes(pinyin: &str, slot: u32, text: &str) -> Vec<u8> {
        let mut buf = build_record_header(utf16_le_bytes(pinyin).len(), slot, [0xA5, 0x2C]).to_vec();
        buf.extend_from_slice(&utf16_le_bytes(pinyin));
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&utf16_le_bytes(text));
        buf.extend_from_slice(&[0, 0]);
        buf
    }

    /// header + offset table + blob, count taken from the slice list
    fn assemble(records: &[Vec<u8>]) -> Vec<u8> {
        let mut image = new_file_header().to_vec();
        put_u32_le(&mut image, PHRASE_COUNT_POS, records.len() as u32);
        let mut end = 0u32;
        for r in &records[..records.len().saturating_sub(1)] {
            end += r.len() as u32;
            image.extend_from_slice(&end.to_le_bytes());
        }
        for r in records {
            image.extend_from_slice(r);
        }
        image
    }

    #[test]
    fn empty_and_short_buffers_decode_empty() {
        assert!(decode_phrases(&[]).is_empty());
        assert!(decode_phrases(&[0u8; 0x20]).is_empty());
    }

    #[test]
    fn zero_count_decodes_empty() {
        let image = new_file_header();
        assert!(decode_phrases(&image).is_empty());
    }

    #[test]
    fn truncated_offset_table_decodes_empty() {
        let mut image = new_file_header().to_vec();
        put_u32_le(&mut image, PHRASE_COUNT_POS, 50);
        image.extend_from_slice(&[0u8; 8]); // far fewer than 4 * 49 bytes
        assert!(decode_phrases(&image).is_empty());
    }

    #[test]
    fn decodes_and_sorts_by_pinyin_then_slot() {
        let image = assemble(&[
            record_bytes("ni", 2, "你"),
            record_bytes("hao", 1, "好"),
            record_bytes("ni", 1, "妮"),
        ]);
        let entries = decode_phrases(&image);
        let listed: Vec<(&str, u32)> = entries.iter().map(|e| (e.pinyin.as_str(), e.slot)).collect();
        assert_eq!(listed, vec![("hao", 1), ("ni", 1), ("ni", 2)]);
    }

    #[test]
    fn deleted_record_is_skipped() {
        let mut deleted = record_bytes("ni", 1, "你");
        deleted[DELETED_FLAG_POS] = 0x01;
        let image = assemble(&[deleted, record_bytes("hao", 2, "好")]);

        let entries = decode_phrases(&image);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pinyin, "hao");

        let scan = scan_records(&image);
        assert!(matches!(scan.records[0], ScannedRecord::Deleted));
    }

    #[test]
    fn malformed_record_does_not_abort_the_walk() {
        // middle record: header plus a body with no separators at all
        let mut broken = build_record_header(2, 1, [0xA5, 0x2C]).to_vec();
        broken.extend_from_slice(&[0x41, 0x00]);
        let image = assemble(&[
            record_bytes("an", 1, "安"),
            broken,
            record_bytes("zu", 3, "组"),
        ]);

        let entries = decode_phrases(&image);
        let pinyins: Vec<&str> = entries.iter().map(|e| e.pinyin.as_str()).collect();
        assert_eq!(pinyins, vec!["an", "zu"]);

        let scan = scan_records(&image);
        assert!(matches!(scan.records[1], ScannedRecord::Malformed(_)));
    }

    #[test]
    fn negative_table_entry_does_not_abort_the_walk() {
        let first = record_bytes("an", 1, "安");
        let second = record_bytes("zu", 3, "组");
        let mut image = assemble(&[first, second]);
        // poison record 0's end offset
        let table_pos = new_file_header().len();
        image[table_pos..table_pos + 4].copy_from_slice(&(-5i32).to_le_bytes());

        let scan = scan_records(&image);
        assert_eq!(scan.records.len(), 2);
        assert!(matches!(scan.records[0], ScannedRecord::Malformed(_)));
        // record 1 starts from the poisoned offset and is rejected too
        assert!(matches!(scan.records[1], ScannedRecord::Malformed(_)));
    }

    #[test]
    fn corrupt_middle_offset_recovers_on_later_records() {
        let records = [
            record_bytes("an", 1, "安"),
            record_bytes("ni", 2, "你"),
            record_bytes("zu", 3, "组"),
        ];
        let mut image = assemble(&records);
        // shrink record 1's end below record 0's end; record 2 then realigns
        let table_pos = new_file_header().len();
        let bad_end = (records[0].len() as u32 / 2).to_le_bytes();
        image[table_pos + 4..table_pos + 8].copy_from_slice(&bad_end);

        let scan = scan_records(&image);
        assert!(matches!(scan.records[0], ScannedRecord::Live(_)));
        assert!(matches!(scan.records[1], ScannedRecord::Malformed(_)));
        // record 2 spans from the bad offset to EOF: bytes are garbage but the
        // walk continues and classifies it on its own merits
        assert_eq!(scan.records.len(), 3);
    }

    #[test]
    fn record_with_invalid_utf16_is_dropped_from_decode() {
        let mut bad = build_record_header(2, 1, [0xA5, 0x2C]).to_vec();
        bad.extend_from_slice(&[0x00, 0xD8]); // lone surrogate pinyin
        bad.extend_from_slice(&[0, 0]);
        bad.extend_from_slice(&utf16_le_bytes("好"));
        bad.extend_from_slice(&[0, 0]);
        let image = assemble(&[bad, record_bytes("hao", 1, "好")]);

        // still a live record at the byte level, dropped at the string level
        let scan = scan_records(&image);
        assert!(matches!(scan.records[0], ScannedRecord::Live(_)));
        let entries = decode_phrases(&image);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pinyin, "hao");
    }

    #[test]
    fn tail_learned_from_first_record() {
        let mut first = record_bytes("ni", 1, "你");
        first[14] = 0xBE;
        first[15] = 0xEF;
        let image = assemble(&[first, record_bytes("hao", 2, "好")]);
        assert_eq!(scan_records(&image).tail, Some([0xBE, 0xEF]));
    }
}
