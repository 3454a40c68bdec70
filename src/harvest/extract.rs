//! Visible-text extraction from HTML
//!
//! The default handler drops non-content elements (scripts, navigation,
//! footers and the like) and advertisement containers, then joins the
//! remaining text nodes with single spaces.

use crate::config::HarvestConfig;
use scraper::node::Element;
use scraper::{Html, Node};
use thiserror::Error;

/// A content handler could not produce text for a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("extraction failed: {reason}")]
pub struct ExtractionError {
    pub reason: String,
}

impl ExtractionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Turns a fetched page body into plain text
///
/// Registered per category in the extraction pipeline; categories without a
/// handler use [`BoilerplateStripper`].
pub trait ContentHandler: Send + Sync {
    fn extract(&self, html: &str) -> Result<String, ExtractionError>;
}

impl<F> ContentHandler for F
where
    F: Fn(&str) -> Result<String, ExtractionError> + Send + Sync,
{
    fn extract(&self, html: &str) -> Result<String, ExtractionError> {
        self(html)
    }
}

/// Default handler: strips non-content markup and extracts visible text
#[derive(Debug, Clone)]
pub struct BoilerplateStripper {
    irrelevant_tags: Vec<String>,
    advertisement_marker: String,
}

impl BoilerplateStripper {
    pub fn new(irrelevant_tags: Vec<String>, advertisement_marker: impl Into<String>) -> Self {
        Self {
            irrelevant_tags: irrelevant_tags
                .into_iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            advertisement_marker: advertisement_marker.into(),
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(
            config.irrelevant_tags.clone(),
            config.advertisement_marker.clone(),
        )
    }

    /// Extracts visible text; never fails
    pub fn extract_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);
        self.collect_text(&document).join(" ")
    }

    fn is_skipped(&self, element: &Element) -> bool {
        if self
            .irrelevant_tags
            .iter()
            .any(|tag| tag == element.name())
        {
            return true;
        }

        !self.advertisement_marker.is_empty()
            && element
                .classes()
                .any(|class| class.contains(self.advertisement_marker.as_str()))
    }

    /// Pre-order walk with an explicit stack, so deeply nested markup is safe
    fn collect_text(&self, document: &Html) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut stack = vec![document.tree.root()];

        while let Some(node) = stack.pop() {
            match node.value() {
                Node::Text(text) => {
                    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !collapsed.is_empty() {
                        pieces.push(collapsed);
                    }
                    continue;
                }
                Node::Element(element) if self.is_skipped(element) => continue,
                _ => {}
            }

            let mut children: Vec<_> = node.children().collect();
            children.reverse();
            stack.extend(children);
        }

        pieces
    }
}

impl Default for BoilerplateStripper {
    fn default() -> Self {
        Self::from_config(&HarvestConfig::default())
    }
}

impl ContentHandler for BoilerplateStripper {
    fn extract(&self, html: &str) -> Result<String, ExtractionError> {
        Ok(self.extract_text(html))
    }
}
