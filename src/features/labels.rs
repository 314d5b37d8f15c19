// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! `labels.txt` bookkeeping for generated image sets.
//!
//! One line per image, `name:label`, where the name is the image file stem
//! and the label is `0` (cover) or `1` (stego).

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::error::{FeatureError, Result};
use super::{COVER, STEGO};

/// Parse `name:label` lines. Blank lines are ignored; a repeated name keeps
/// the last label.
pub fn parse_labels(text: &str) -> Result<BTreeMap<String, u8>> {
    let mut labels = BTreeMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let Some((name, value)) = raw.split_once(':') else {
            return Err(FeatureError::Labels {
                line,
                message: format!("expected name:label, got {raw:?}"),
            });
        };
        let label = match value.trim() {
            "0" => COVER,
            "1" => STEGO,
            other => {
                return Err(FeatureError::Labels {
                    line,
                    message: format!("label must be 0 or 1, got {other:?}"),
                })
            }
        };
        labels.insert(name.to_string(), label);
    }
    Ok(labels)
}

/// Read a labels file from disk.
pub fn read_labels(path: impl AsRef<Path>) -> Result<BTreeMap<String, u8>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| FeatureError::io(path, e))?;
    parse_labels(&text)
}

/// Append one `name:label` line, creating the file if needed.
pub fn append_label(path: impl AsRef<Path>, name: &str, label: u8) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FeatureError::io(path, e))?;
    writeln!(file, "{name}:{label}").map_err(|e| FeatureError::io(path, e))
}
