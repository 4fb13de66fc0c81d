//! Opening CSV files with encoding and delimiter auto-detection.
//!
//! Files exported from spreadsheets are often Latin-1 or Windows-1252 and
//! use `;` as a delimiter. These helpers decode the bytes to UTF-8 and sniff
//! the delimiter from the first line before handing the text to the `csv`
//! tokenizer.

use std::io::Cursor;
use std::path::Path;

use serde::Serialize;

use crate::config::SourceOptions;
use crate::error::Result;
use crate::source::CsvSource;

/// Delimiters considered by [`detect_delimiter`], in order of preference on ties.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b';', b',', b'\t', b'|'];

/// A CSV source over decoded, in-memory text.
pub type TextSource = CsvSource<Cursor<String>>;

/// What auto-detection found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputInfo {
    pub encoding: String,
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet. Valid UTF-8 is taken as is.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string. Unknown encodings fall back to lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let label = encoding.to_lowercase();
    let decoder = match label.as_str() {
        "utf-8" | "utf8" | "ascii" => None,
        "latin-1" => Some(encoding_rs::WINDOWS_1252),
        other => encoding_rs::Encoding::for_label(other.as_bytes()),
    };

    match decoder {
        Some(decoder) if decoder != encoding_rs::UTF_8 => decoder.decode(bytes).0.into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Pick the candidate delimiter occurring most often in the first line.
/// Defaults to `,` when none occurs.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for &candidate in &CANDIDATE_DELIMITERS {
        let count = first_line.bytes().filter(|&b| b == candidate).count();
        if count > best_count {
            best_count = count;
            best = candidate;
        }
    }
    best
}

/// Decode `bytes` and build a source. A `delimiter` of `None` is sniffed
/// from the first line; the rest of `options` is used as given.
pub fn open_bytes_auto(
    bytes: &[u8],
    delimiter: Option<u8>,
    options: &SourceOptions,
) -> (TextSource, InputInfo) {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));

    tracing::debug!(
        encoding = %encoding,
        delimiter = %char::from(delimiter).escape_default(),
        "decoded csv input"
    );

    let options = SourceOptions {
        delimiter,
        ..*options
    };
    let source = CsvSource::new(options.builder().from_reader(Cursor::new(content)));
    let info = InputInfo {
        encoding,
        delimiter: char::from(delimiter),
    };
    (source, info)
}

/// Read a file and build a source with [`open_bytes_auto`].
pub fn open_path_auto<P: AsRef<Path>>(
    path: P,
    delimiter: Option<u8>,
    options: &SourceOptions,
) -> Result<(TextSource, InputInfo)> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(open_bytes_auto(&bytes, delimiter, options))
}
