use nom::bytes::complete::take;
use nom::number::complete::{le_i32, le_u32};
use nom::sequence::tuple;
use nom::IResult;

/// ASCII identifier at offset 0
pub const LEX_MAGIC: &[u8; 8] = b"mschxudp";
/// constant flags at offset 8
pub const FILE_FLAGS: [u8; 8] = [0x02, 0x00, 0x60, 0x00, 0x01, 0x00, 0x00, 0x00];

/// fixed header region; the offset table starts right after it
pub const FIXED_HEADER_LEN: usize = 0x44;
/// base the blob-start field counts from: `0x40 + 4 * count`
pub const TABLE_BASE: u32 = 0x40;

pub const BLOB_START_POS: usize = 0x14;
pub const TOTAL_LEN_POS: usize = 0x18;
pub const PHRASE_COUNT_POS: usize = 0x1C;

/// Parsed view of the fixed header. Parsing is lenient: the magic is captured
/// but not enforced, so a file with a foreign identifier still decodes by its
/// own counts (the host rewrites these files in place and we follow suit).
#[derive(Debug)]
pub struct LexHeader {
    pub magic: [u8; 8],
    /// offset 0x10, constant 0x40 in every observed file
    pub table_offset: u32,
    /// offset 0x14, start of the record blob: `0x40 + 4 * count`
    pub blob_offset: u32,
    /// offset 0x18, byte length of the whole file image
    pub total_len: u32,
    /// offset 0x1C; the host stores a signed count
    pub phrase_count: i32,
}

impl LexHeader {
    pub fn magic_ok(&self) -> bool {
        &self.magic == LEX_MAGIC
    }
}

/// Parse the 0x44-byte fixed header; the remaining input starts at the
/// offset table.
pub fn parse_header(data: &[u8]) -> IResult<&[u8], LexHeader> {
    let (data, magic) = take(8usize)(data)?;
    let (data, _flags) = take(8usize)(data)?;
    let (data, (table_offset, blob_offset, total_len, phrase_count)) =
        tuple((le_u32, le_u32, le_u32, le_i32))(data)?;
    let (data, _reserved) = take(36usize)(data)?;

    let mut m = [0u8; 8];
    m.copy_from_slice(magic);
    Ok((
        data,
        LexHeader {
            magic: m,
            table_offset,
            blob_offset,
            total_len,
            phrase_count,
        },
    ))
}

/// Header image for a freshly initialized, empty lexicon. Counts and total
/// length stay zero until the first rebuild patches them; the reserved region
/// stays zero-filled.
pub fn new_file_header() -> [u8; FIXED_HEADER_LEN] {
    let mut h = [0u8; FIXED_HEADER_LEN];
    h[..8].copy_from_slice(LEX_MAGIC);
    h[8..16].copy_from_slice(&FILE_FLAGS);
    h[0x10..0x14].copy_from_slice(&TABLE_BASE.to_le_bytes());
    h[0x14..0x18].copy_from_slice(&TABLE_BASE.to_le_bytes());
    h
}
