use crate::util::string::split_nul_fields;

pub(crate) const RECORD_HEADER_LEN: usize = 16;
/// 2-byte 0x0000 separator after pinyin and after text
pub(crate) const FIELD_SEP: [u8; 2] = [0x00, 0x00];
/// byte 9 of the record header: zero = live, nonzero = logically deleted
pub(crate) const DELETED_FLAG_POS: usize = 9;
/// tail bytes written when the file has no record to learn them from
pub(crate) const DEFAULT_TAIL: [u8; 2] = [0xA5, 0x2C];

const MARKER_A: u16 = 0x0010;
const MARKER_B: u16 = 0x0010;
const MARKER_C: u16 = 0x0006;
const MARKER_D: u16 = 0x0000;

/// One on-disk record: verbatim 16-byte header plus the still-encoded
/// UTF-16LE field bytes. Kept opaque outside the codec; rewrites carry these
/// bytes through unchanged so whatever the host stored survives.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub(crate) header: [u8; RECORD_HEADER_LEN],
    pub(crate) pinyin: Vec<u8>,
    pub(crate) text: Vec<u8>,
}

impl RawRecord {
    /// slot/index dword at header bytes 6..10
    pub fn slot(&self) -> u32 {
        u32::from_le_bytes([
            self.header[6],
            self.header[7],
            self.header[8],
            self.header[9],
        ])
    }

    /// tail bytes at header offset 14..16, meaning unknown, preserved as-is
    pub fn tail(&self) -> [u8; 2] {
        [self.header[14], self.header[15]]
    }

    pub(crate) fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.pinyin.len() + FIELD_SEP.len() + self.text.len() + FIELD_SEP.len()
    }

    pub(crate) fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.header);
        buf.extend_from_slice(&self.pinyin);
        buf.extend_from_slice(&FIELD_SEP);
        buf.extend_from_slice(&self.text);
        buf.extend_from_slice(&FIELD_SEP);
    }

    /// Classify one slice of the record blob. `tail` learns from the first
    /// slice long enough to carry one, live or not, matching how the host
    /// tool scavenges the value.
    pub(crate) fn classify(seg: &[u8], tail: &mut Option<[u8; 2]>) -> super::ScannedRecord {
        use super::ScannedRecord::{Deleted, Live, Malformed};

        if seg.len() < RECORD_HEADER_LEN {
            return Malformed("record shorter than its 16-byte header");
        }
        if tail.is_none() {
            *tail = Some([seg[14], seg[15]]);
        }
        if seg[DELETED_FLAG_POS] != 0x00 {
            return Deleted;
        }
        let fields = split_nul_fields(&seg[RECORD_HEADER_LEN..], 2);
        if fields.len() < 2 {
            return Malformed("record body is missing pinyin/text separators");
        }
        let mut header = [0u8; RECORD_HEADER_LEN];
        header.copy_from_slice(&seg[..RECORD_HEADER_LEN]);
        Live(RawRecord {
            header,
            pinyin: fields[0].to_vec(),
            text: fields[1].to_vec(),
        })
    }
}

/// Fresh record header for a new entry. The length field covers header +
/// encoded pinyin + one separator; the slot rides in the index dword (slots
/// are 1..=9, so the deletion byte inside it stays zero).
pub(crate) fn build_record_header(pinyin_len: usize, slot: u32, tail: [u8; 2]) -> [u8; RECORD_HEADER_LEN] {
    let mut h = [0u8; RECORD_HEADER_LEN];
    h[0..2].copy_from_slice(&MARKER_A.to_le_bytes());
    h[2..4].copy_from_slice(&MARKER_B.to_le_bytes());
    let len = (RECORD_HEADER_LEN + pinyin_len + FIELD_SEP.len()) as u16;
    h[4..6].copy_from_slice(&len.to_le_bytes());
    h[6..10].copy_from_slice(&slot.to_le_bytes());
    h[10..12].copy_from_slice(&MARKER_C.to_le_bytes());
    h[12..14].copy_from_slice(&MARKER_D.to_le_bytes());
    h[14] = tail[0];
    h[15] = tail[1];
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::ScannedRecord;
    use crate::util::string::utf16_le_bytes;

    fn record_bytes(pinyin: &str, slot: u32, text: &str, tail: [u8; 2]) -> Vec<u8> {
        let rec = RawRecord {
            header: build_record_header(utf16_le_bytes(pinyin).len(), slot, tail),
            pinyin: utf16_le_bytes(pinyin),
            text: utf16_le_bytes(text),
        };
        let mut buf = Vec::new();
        rec.write_to(&mut buf);
        buf
    }

    #[test]
    fn header_layout() {
        let h = build_record_header(4, 3, [0xAB, 0xCD]);
        assert_eq!(&h[0..2], &[0x10, 0x00]);
        assert_eq!(&h[2..4], &[0x10, 0x00]);
        // 16 + 4 + 2
        assert_eq!(u16::from_le_bytes([h[4], h[5]]), 22);
        assert_eq!(u32::from_le_bytes([h[6], h[7], h[8], h[9]]), 3);
        assert_eq!(&h[10..12], &[0x06, 0x00]);
        assert_eq!(&h[12..14], &[0x00, 0x00]);
        assert_eq!(&h[14..16], &[0xAB, 0xCD]);
    }

    #[test]
    fn classify_live_record() {
        let buf = record_bytes("ni", 1, "你", [0xA5, 0x2C]);
        let mut tail = None;
        match RawRecord::classify(&buf, &mut tail) {
            ScannedRecord::Live(rec) => {
                assert_eq!(rec.pinyin, utf16_le_bytes("ni"));
                assert_eq!(rec.text, utf16_le_bytes("你"));
                assert_eq!(rec.slot(), 1);
                assert_eq!(rec.encoded_len(), buf.len());
            }
            other => panic!("expected live record, got {other:?}"),
        }
        assert_eq!(tail, Some([0xA5, 0x2C]));
    }

    #[test]
    fn classify_deleted_record_still_learns_tail() {
        let mut buf = record_bytes("ni", 1, "你", [0x11, 0x22]);
        buf[DELETED_FLAG_POS] = 0x01;
        let mut tail = None;
        assert!(matches!(
            RawRecord::classify(&buf, &mut tail),
            ScannedRecord::Deleted
        ));
        assert_eq!(tail, Some([0x11, 0x22]));
    }

    #[test]
    fn classify_truncated_record() {
        let mut tail = None;
        assert!(matches!(
            RawRecord::classify(&[0u8; 10], &mut tail),
            ScannedRecord::Malformed(_)
        ));
        assert_eq!(tail, None);
    }

    #[test]
    fn classify_body_without_separators() {
        let mut buf = build_record_header(2, 1, DEFAULT_TAIL).to_vec();
        buf.extend_from_slice(&[0x41, 0x00]); // one unterminated field only
        let mut tail = None;
        assert!(matches!(
            RawRecord::classify(&buf, &mut tail),
            ScannedRecord::Malformed(_)
        ));
    }
}
