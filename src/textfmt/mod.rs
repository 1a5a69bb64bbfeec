//! Line-oriented text form of the lexicon: `pinyin slot text`, one entry per
//! line. Blank lines and `#` comments are ignored. Import validation follows
//! what the host UI accepts for a candidate entry.

use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::PhraseEntry;

pub const MAX_PINYIN_CHARS: usize = 32;
pub const MAX_TEXT_CHARS: usize = 64;
pub const MIN_SLOT: u32 = 1;
pub const MAX_SLOT: u32 = 9;

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(\d+)\s+(.+?)\s*$").unwrap());

/// One rejected input line and the reason it was rejected.
#[derive(Debug)]
pub struct LineIssue {
    /// 1-based line number in the input text
    pub line: usize,
    pub reason: String,
}

/// Result of validating an import text: the accepted entries plus everything
/// that was reported and excluded. The import still proceeds with `entries`.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub entries: Vec<PhraseEntry>,
    pub issues: Vec<LineIssue>,
    pub total_lines: usize,
}

pub fn parse_import_text(text: &str) -> ImportBatch {
    let mut batch = ImportBatch::default();
    for (idx, raw) in text.replace("\r\n", "\n").split('\n').enumerate() {
        batch.total_lines += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_line(line) {
            Ok(entry) => batch.entries.push(entry),
            Err(reason) => batch.issues.push(LineIssue {
                line: idx + 1,
                reason,
            }),
        }
    }
    batch
}

/// Parse and validate one non-comment line. The accepted pinyin is
/// lowercased; the text is kept as written (single line by construction).
pub fn parse_line(line: &str) -> std::result::Result<PhraseEntry, String> {
    let caps = LINE_RE
        .captures(line)
        .ok_or_else(|| "line does not match `pinyin slot text`".to_string())?;

    let pinyin = caps[1].trim().to_string();
    let slot: u32 = caps[2]
        .parse()
        .map_err(|_| "slot is not a valid number".to_string())?;
    let text = caps[3].trim().to_string();

    validate_pinyin(&pinyin)?;
    if !(MIN_SLOT..=MAX_SLOT).contains(&slot) {
        return Err(format!("slot {slot} is outside {MIN_SLOT}..{MAX_SLOT}"));
    }
    let text_chars = text.chars().count();
    if text_chars == 0 || text_chars > MAX_TEXT_CHARS {
        return Err(format!("text must be 1..{MAX_TEXT_CHARS} characters"));
    }

    Ok(PhraseEntry {
        pinyin: pinyin.to_ascii_lowercase(),
        slot,
        text,
    })
}

/// 拼音限制：1..=32 个 ASCII 字母，不能以 u/v 开头（输入法不接受）。
fn validate_pinyin(pinyin: &str) -> std::result::Result<(), String> {
    if pinyin.is_empty() || pinyin.chars().count() > MAX_PINYIN_CHARS {
        return Err(format!("pinyin must be 1..{MAX_PINYIN_CHARS} letters"));
    }
    if !pinyin.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("pinyin may only contain ASCII letters".to_string());
    }
    if pinyin.starts_with(['u', 'U', 'v', 'V']) {
        return Err("pinyin may not start with u or v".to_string());
    }
    Ok(())
}

pub fn format_line(entry: &PhraseEntry) -> String {
    format!("{} {} {}", entry.pinyin, entry.slot, entry.text)
}
