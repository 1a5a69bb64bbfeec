use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::lexicon::header::parse_header;
use crate::lexicon::{decode_phrases, scan_records, upsert_phrases, ScannedRecord};
use crate::textfmt;

pub fn list(lex: &Path, filter: Option<&str>, json: bool) -> Result<()> {
    let data = read_lexicon(lex)?;
    let mut entries = decode_phrases(&data);
    if let Some(f) = filter {
        entries.retain(|e| e.pinyin.eq_ignore_ascii_case(f));
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", textfmt::format_line(entry));
        }
    }
    Ok(())
}

pub fn export(lex: &Path, output: &Path) -> Result<()> {
    let data = read_lexicon(lex)?;
    let entries = decode_phrases(&data);

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let mut text = String::new();
    for entry in &entries {
        text.push_str(&textfmt::format_line(entry));
        text.push('\n');
    }
    fs::write(output, text).with_context(|| format!("failed to write {}", output.display()))?;
    info!("exported {} phrases to {}", entries.len(), output.display());
    Ok(())
}

pub struct ImportOptions {
    pub backup: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

pub fn import(lex: &Path, input: &Path, opts: &ImportOptions) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let batch = textfmt::parse_import_text(&text);

    for issue in &batch.issues {
        warn!("line {}: {}", issue.line, issue.reason);
        if opts.verbose {
            println!("line {}: {}", issue.line, issue.reason);
        }
    }
    if opts.dry_run {
        println!(
            "dry run: {} phrases would be written, {} lines skipped",
            batch.entries.len(),
            batch.issues.len()
        );
        return Ok(());
    }

    if opts.backup && lex.exists() {
        let bak = backup_path(lex);
        fs::copy(lex, &bak)
            .with_context(|| format!("failed to back up lexicon to {}", bak.display()))?;
        info!("backup written to {}", bak.display());
    }

    let overwritten = upsert_phrases(lex, &batch.entries)
        .with_context(|| format!("failed to update {}", lex.display()))?;
    println!(
        "imported {} phrases ({} replaced, {} lines skipped)",
        batch.entries.len(),
        overwritten,
        batch.issues.len()
    );
    Ok(())
}

pub fn inspect(lex: &Path, verbose: bool) -> Result<()> {
    println!("lexicon: {}", lex.display());
    let data = match fs::read(lex) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("file does not exist (it is created on first import)");
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", lex.display()));
        }
    };
    println!("file size: {} bytes", data.len());

    match parse_header(&data) {
        Ok((_, header)) => {
            println!("magic: {}", if header.magic_ok() { "ok" } else { "FOREIGN" });
            println!("declared count: {}", header.phrase_count);
            println!("blob offset: {:#x}", header.blob_offset);
            println!("declared total: {} bytes", header.total_len);
        }
        Err(_) => println!("header: too short to parse"),
    }

    let scan = scan_records(&data);
    let mut live = 0usize;
    let mut deleted = 0usize;
    let mut malformed = 0usize;
    for rec in &scan.records {
        match rec {
            ScannedRecord::Live(_) => live += 1,
            ScannedRecord::Deleted => deleted += 1,
            ScannedRecord::Malformed(_) => malformed += 1,
        }
    }
    println!("records: {live} live, {deleted} deleted, {malformed} malformed");
    if let Some(tail) = scan.tail {
        println!("tail bytes: {:02X} {:02X}", tail[0], tail[1]);
    }

    if verbose {
        let entries = decode_phrases(&data);
        println!("decoded {} phrases", entries.len());
        for entry in entries.iter().take(5) {
            println!("  {}", textfmt::format_line(entry));
        }
    }
    Ok(())
}

fn read_lexicon(lex: &Path) -> Result<Vec<u8>> {
    fs::read(lex).with_context(|| format!("failed to read lexicon {}", lex.display()))
}

/// `ChsPinyinEUDPv1.lex` -> `ChsPinyinEUDPv1.<epoch-secs>.bak.lex`, next to
/// the original so a rename can restore it.
fn backup_path(lex: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    lex.with_extension(format!("{secs}.bak.lex"))
}
