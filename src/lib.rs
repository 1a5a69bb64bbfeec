//! Reader/writer for the Microsoft Pinyin user-defined phrase lexicon
//! (`ChsPinyinEUDPv1.lex`).
//!
//! The codec lives in [`lexicon`]: `decode_phrases` turns the raw file bytes
//! into sorted [`lexicon::PhraseEntry`] values, `upsert_phrases` rebuilds and
//! atomically replaces the file with a merged record set. Everything else is
//! tooling around those two calls.
//!
//! All operations are synchronous and re-read the file from disk; there is no
//! cache across calls and no cross-process coordination. Callers that need a
//! batch of entries applied together should pass them in one `upsert_phrases`
//! call, since every call performs one complete rebuild.

pub mod config;
pub mod handlers;
pub mod lexicon;
pub mod textfmt;
pub mod util;
