pub mod explain;
pub mod patterns;
pub mod segment;

use anyhow::Result;
use serde::Serialize;

use explain::SubItem;
use patterns::PatternSet;
use segment::Segmenter;

/// One extracted problem: heading number and title, introductory body,
/// and the labeled answer-choice breakdown in source order.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemRecord {
    pub number: String,
    pub title: String,
    pub body: String,
    pub sub_items: Vec<SubItem>,
}

impl ProblemRecord {
    /// Body plus each sub-item rendered as "label. text", joined by
    /// blank lines. This is the flat `explanation` column of the CSV.
    pub fn explanation(&self) -> String {
        let mut parts = Vec::with_capacity(1 + self.sub_items.len());
        if !self.body.is_empty() {
            parts.push(self.body.clone());
        }
        for item in &self.sub_items {
            parts.push(format!("{}. {}", item.label, item.text));
        }
        parts.join("\n\n")
    }
}

/// Two-pass pipeline per problem: pages → raw segments → structured
/// records. Lazy on both ends — each pull from the returned iterator
/// does exactly the work for one record.
pub fn extract_problems<'a, I>(
    patterns: &'a PatternSet,
    pages: I,
) -> impl Iterator<Item = Result<ProblemRecord>> + 'a
where
    I: Iterator<Item = String> + 'a,
{
    Segmenter::new(patterns, pages).map(move |segment| {
        let segment = segment?;
        let (body, sub_items) = explain::structure(patterns, &segment.trailing)?;
        Ok(ProblemRecord {
            number: segment.number.trim().to_string(),
            title: segment.title.trim().to_string(),
            body,
            sub_items,
        })
    })
}
