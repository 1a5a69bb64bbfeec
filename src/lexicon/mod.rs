//! Codec for the `.lex` user-phrase lexicon.
//!
//! File structure, all integers little-endian:
//!
//! ```text
//! ┌──────────────┬─────────────────────┬────────────────────────────┐
//! │ header 0x44B │ offset table 4(n-1)B│ record blob                │
//! └──────────────┴─────────────────────┴────────────────────────────┘
//!                                       ▲
//! table[i] = end of record i            │ record: [16B header]
//! relative to blob start;               │         [pinyin UTF-16LE][00 00]
//! the last record ends at EOF           │         [text   UTF-16LE][00 00]
//! ```
//!
//! 读取时按偏移表切分记录区；重写时整体重建：保留的旧记录原样携带自己的
//! 16 字节头，新记录继承文件中学到的 tail 字节。

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod phrase;
pub mod record;

pub use decoder::{decode_phrases, scan_records, LexScan, ScannedRecord};
pub use encoder::upsert_phrases;
pub use error::LexError;
pub use phrase::PhraseEntry;
pub use record::RawRecord;
