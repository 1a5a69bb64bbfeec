use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// 微软拼音当前用户自定义短语词库文件名。
pub const USER_LEX_FILE: &str = "ChsPinyinEUDPv1.lex";

/// Default lexicon location for the current user. Only resolvable where the
/// host IME lives (an `APPDATA` environment); elsewhere callers must pass an
/// explicit path.
pub fn default_lex_path() -> Result<PathBuf> {
    let appdata = env::var_os("APPDATA")
        .context("APPDATA is not set; pass --lex <PATH> to point at a lexicon file")?;
    let mut path = PathBuf::from(appdata);
    path.push("Microsoft");
    path.push("InputMethod");
    path.push("Chs");
    path.push(USER_LEX_FILE);
    Ok(path)
}
