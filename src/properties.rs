//! Parser for flat `key=value` properties files.
//!
//! Follows the usual `.properties` rules: `#`/`!` comments, `=`, `:` or
//! whitespace separators, backslash line continuations and `\uXXXX` escapes.

use crate::error::PropertiesError;
use std::collections::BTreeMap;
use std::io::Read;

/// Parsed key/value pairs from a properties file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesSource {
    entries: BTreeMap<String, String>,
}

impl PropertiesSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text.
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let mut entries = BTreeMap::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line.text, line.number)?;
            // Later assignments replace earlier ones.
            entries.insert(key, value);
        }
        Ok(Self { entries })
    }

    /// Read and parse a byte stream. Input that is not valid UTF-8 is decoded as ISO-8859-1.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, PropertiesError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
        };
        Self::parse(&text)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertiesSource {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { entries }
    }
}

struct LogicalLine {
    text: String,
    /// 1-based number of the natural line the entry starts on.
    number: usize,
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Count trailing backslashes; an odd count means the line continues.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Join continuation lines and drop comments and blank lines.
fn logical_lines(text: &str) -> Vec<LogicalLine> {
    let mut lines = Vec::new();
    let mut natural = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .flat_map(|l| l.split('\r'))
        .enumerate();

    while let Some((i, raw)) = natural.next() {
        let trimmed = raw.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut text = String::from(trimmed);
        while continues(&text) {
            text.pop();
            match natural.next() {
                Some((_, next)) => text.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }
        lines.push(LogicalLine {
            text,
            number: i + 1,
        });
    }
    lines
}

/// Split a logical line into an unescaped key and value.
fn split_entry(line: &str, number: usize) -> Result<(String, String), PropertiesError> {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = 0;
    let mut escaped = false;

    while pos < chars.len() {
        let c = chars[pos];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            break;
        }
        pos += 1;
    }
    let key_end = pos;

    // Whitespace, then at most one separator, then whitespace.
    while pos < chars.len() && is_blank(chars[pos]) {
        pos += 1;
    }
    if pos < chars.len() && (chars[pos] == '=' || chars[pos] == ':') {
        pos += 1;
    }
    while pos < chars.len() && is_blank(chars[pos]) {
        pos += 1;
    }

    let key = unescape(&chars[..key_end], number)?;
    let value = unescape(&chars[pos..], number)?;
    Ok((key, value))
}

fn unescape(chars: &[char], number: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(chars.len());
    let mut iter = chars.iter().copied();

    while let Some(c) = iter.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match iter.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let decoded = match code_unit(&mut iter) {
                    // A high surrogate must be followed by an escaped low surrogate.
                    Some(high @ 0xD800..=0xDBFF) => match (iter.next(), iter.next()) {
                        (Some('\\'), Some('u')) => code_unit(&mut iter).and_then(|low| {
                            char::decode_utf16([high, low]).next().and_then(Result::ok)
                        }),
                        _ => None,
                    },
                    Some(unit) => char::from_u32(u32::from(unit)),
                    None => None,
                }
                .ok_or(PropertiesError::MalformedUnicodeEscape { line: number })?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Read the four hex digits of a `\uXXXX` escape as one UTF-16 code unit.
fn code_unit(iter: &mut impl Iterator<Item = char>) -> Option<u16> {
    let hex: String = iter.take(4).collect();
    if hex.len() != 4 {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}
