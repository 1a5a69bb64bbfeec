use serde_derive::Serialize;

use crate::lexicon::record::RawRecord;
use crate::util::string::string_from_utf16_le;

/// One user-defined phrase as callers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseEntry {
    /// phonetic key, lowercase ASCII letters; replacement key on write
    pub pinyin: String,
    /// candidate position in the IME matching UI, 1..=9
    pub slot: u32,
    /// the phrase text, single-line-feed normalized and trimmed
    pub text: String,
}

impl PhraseEntry {
    /// Decode a live raw record into an entry. Returns `None` when the field
    /// bytes are not valid UTF-16LE or either field normalizes to empty; the
    /// caller drops such records silently.
    pub(crate) fn from_raw(raw: &RawRecord) -> Option<PhraseEntry> {
        let pinyin = string_from_utf16_le(&raw.pinyin).ok()?;
        let text = string_from_utf16_le(&raw.text).ok()?;

        let pinyin = pinyin.trim().to_string();
        let text = normalize_text(&text);
        if pinyin.is_empty() || text.is_empty() {
            return None;
        }
        Some(PhraseEntry {
            pinyin,
            slot: raw.slot(),
            text,
        })
    }
}

/// CRLF 统一为 LF，再去掉首尾空白。
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}
