use anyhow::anyhow;
use regex::Captures;
use tracing::debug;

use super::patterns::PatternSet;

/// One problem's worth of source text, as found by the segmenter:
/// heading number and title plus everything up to the next heading.
#[derive(Debug, Clone)]
pub struct RawSegment {
    pub number: String,
    pub title: String,
    pub trailing: String,
}

/// Streaming segmenter: turns an iterator of page strings into an
/// iterator of complete problem segments.
///
/// The buffer plus the consumed offset always hold exactly the suffix
/// of the document not yet attributed to an emitted segment. A segment
/// is emitted mid-stream only when the `stream` pattern sees the start
/// of the following heading (its `next` group), so nothing is emitted
/// that a later page could still extend. Scanning resumes at the start
/// of that heading — it is observed, never consumed. Once the input is
/// exhausted, the `final` pattern recovers the last segment, which has
/// no following heading to confirm it.
pub struct Segmenter<'a, I> {
    patterns: &'a PatternSet,
    chunks: I,
    buf: String,
    consumed: usize,
    flushing: bool,
    done: bool,
}

impl<'a, I> Segmenter<'a, I>
where
    I: Iterator<Item = String>,
{
    pub fn new(patterns: &'a PatternSet, chunks: I) -> Self {
        Segmenter {
            patterns,
            chunks,
            buf: String::new(),
            consumed: 0,
            flushing: false,
            done: false,
        }
    }
}

impl<I> Iterator for Segmenter<'_, I>
where
    I: Iterator<Item = String>,
{
    type Item = anyhow::Result<RawSegment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if !self.flushing {
                if let Some(caps) = self.patterns.stream.captures(&self.buf[self.consumed..]) {
                    let resume = match caps.name("next") {
                        Some(next) if next.start() > 0 => next.start(),
                        _ => caps.get(0).unwrap().end(),
                    };
                    if resume == 0 {
                        // Zero-width match: scanning would never advance.
                        // Hand the remainder to the tail flush instead.
                        self.flushing = true;
                        continue;
                    }
                    let segment = segment_from(&caps);
                    self.consumed += resume;
                    return Some(Ok(segment));
                }
                match self.chunks.next() {
                    Some(chunk) => {
                        // Compact before growing: the consumed prefix
                        // belongs to already-emitted segments.
                        if self.consumed > 0 {
                            self.buf.drain(..self.consumed);
                            self.consumed = 0;
                        }
                        self.buf.push_str(&chunk);
                    }
                    None => self.flushing = true,
                }
                continue;
            }

            let scan = &self.buf[self.consumed..];
            if let Some(caps) = self.patterns.final_.captures(scan) {
                let segment = segment_from(&caps);
                let end = caps.get(0).unwrap().end();
                if end == 0 {
                    self.done = true;
                }
                self.consumed += end;
                return Some(Ok(segment));
            }

            let leftover = scan.trim();
            self.done = true;
            if !leftover.is_empty() {
                if self.patterns.strict {
                    let chars = leftover.chars().count();
                    self.buf.clear();
                    return Some(Err(anyhow!(
                        "{} chars of trailing text matched no problem boundary",
                        chars
                    )));
                }
                debug!(
                    chars = leftover.chars().count(),
                    "dropping trailing text with no problem boundary"
                );
            }
            self.buf.clear();
            self.consumed = 0;
            return None;
        }
    }
}

fn segment_from(caps: &Captures) -> RawSegment {
    let group = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    };
    RawSegment {
        number: group("number"),
        title: group("title"),
        trailing: group("body"),
    }
}
