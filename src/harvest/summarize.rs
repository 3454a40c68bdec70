//! Length-bounded summarization of text blocks

use super::dedup::split_sentences;

/// Condenses a text block
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> String;
}

/// Keeps leading sentences up to a character budget
///
/// Text at or under `threshold` characters is returned unchanged. Longer text
/// is cut at the last sentence boundary that fits; a first sentence longer
/// than the budget is cut at a character boundary instead. A threshold of 0
/// disables summarization.
#[derive(Debug, Clone, Copy)]
pub struct LeadSummarizer {
    threshold: usize,
}

impl LeadSummarizer {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str) -> String {
        if self.threshold == 0 || text.chars().count() <= self.threshold {
            return text.to_string();
        }

        let mut summary = String::new();
        for sentence in split_sentences(text) {
            let separator = usize::from(!summary.is_empty());
            if summary.chars().count() + separator + sentence.chars().count() > self.threshold {
                break;
            }
            if separator == 1 {
                summary.push(' ');
            }
            summary.push_str(sentence);
        }

        if summary.is_empty() {
            summary = text.chars().take(self.threshold).collect();
        }
        summary
    }
}

impl<F> Summarizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn summarize(&self, text: &str) -> String {
        self(text)
    }
}
