use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::patterns::PatternSet;

/// One labeled answer choice within a problem's explanation. Order is
/// significant and follows appearance order in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubItem {
    pub label: String,
    pub text: String,
}

/// Split one segment's trailing text into an introductory body and its
/// labeled sub-items. Without a first-item delimiter the whole text is
/// body. Item text is trimmed at the edges; internal newlines survive.
pub fn structure(patterns: &PatternSet, trailing: &str) -> Result<(String, Vec<SubItem>)> {
    let Some(first) = patterns.first_item_delimiter.find(trailing) else {
        return Ok((trailing.trim().to_string(), Vec::new()));
    };

    let body = trailing[..first.start()].trim().to_string();
    let items_block = &trailing[first.start()..];

    let mut sub_items = Vec::new();
    for piece in split_before(&patterns.item_split_delimiter, items_block) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        let item = patterns.sub_item.captures(piece).and_then(|caps| {
            match (caps.name("label"), caps.name("text")) {
                (Some(label), Some(text)) => Some(SubItem {
                    label: label.as_str().to_string(),
                    text: text.as_str().trim().to_string(),
                }),
                _ => None,
            }
        });
        match item {
            Some(item) => sub_items.push(item),
            None if patterns.strict => {
                bail!("no sub-item match in items block: {:?}", piece)
            }
            None => debug!("skipping items-block piece with no sub-item match: {:?}", piece),
        }
    }
    Ok((body, sub_items))
}

/// Slice `text` at the start of every delimiter match. The delimiter
/// stays attached to the piece it opens (split-before, not split-on).
fn split_before<'t>(delimiter: &Regex, text: &'t str) -> Vec<&'t str> {
    let starts: Vec<usize> = delimiter.find_iter(text).map(|m| m.start()).collect();
    if starts.is_empty() {
        return vec![text];
    }
    let mut pieces = Vec::with_capacity(starts.len() + 1);
    if starts[0] > 0 {
        pieces.push(&text[..starts[0]]);
    }
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        pieces.push(&text[start..end]);
    }
    pieces
}
