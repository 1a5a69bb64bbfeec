/// utf16 little endian bytes to string, equals python bytes.decode("utf-16-le")
pub fn string_from_utf16_le(slice: &[u8]) -> anyhow::Result<String> {
    if slice.len() % 2 != 0 {
        anyhow::bail!("utf-16le bytes length is odd: {}", slice.len());
    }
    let units = slice
        .chunks_exact(2)
        .map(|e| u16::from_le_bytes([e[0], e[1]]))
        .collect::<Vec<_>>();
    let s = String::from_utf16(&units)?;
    Ok(s)
}

/// string to utf16 little endian bytes, without terminator
pub fn utf16_le_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

/// 按 2 字节一组扫描，以 0x0000 为分隔符切分 UTF-16LE 字段。
///
/// 短于 `min_len` 字节的段被丢弃，末尾不满一组的单字节被忽略。
/// 前提：字段内部不会出现合法的 0x0000 码元（对拼音和常规短语文本成立）；
/// 这是文件格式本身的约束，不是本解析器的缺陷。
pub(crate) fn split_nul_fields(buf: &[u8], min_len: usize) -> Vec<&[u8]> {
    let mut fields = Vec::new();
    let end = buf.len() - buf.len() % 2;
    let mut start = 0;
    let mut i = 0;
    while i < end {
        if buf[i] == 0x00 && buf[i + 1] == 0x00 {
            if i - start >= min_len {
                fields.push(&buf[start..i]);
            }
            start = i + 2;
        }
        i += 2;
    }
    if end - start >= min_len {
        fields.push(&buf[start..end]);
    }
    fields
}
