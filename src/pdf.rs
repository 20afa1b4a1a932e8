use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::info;

/// Extract plain text from a PDF, one string per page.
///
/// pdf-extract can panic on malformed files, so the call is wrapped in
/// catch_unwind and surfaced as an ordinary error.
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let result = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(path)
    }));

    match result {
        Ok(Ok(pages)) => {
            info!(pages = pages.len(), "extracted page text");
            Ok(pages)
        }
        Ok(Err(e)) => Err(anyhow!(
            "failed to extract text from {}: {e}",
            path.display()
        )),
        Err(_) => Err(anyhow!(
            "PDF extraction panicked on {} (malformed PDF)",
            path.display()
        )),
    }
}
