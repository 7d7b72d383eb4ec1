//! Styled text runs.
//!
//! A [`StyledTextBuilder`] collects `(text, style)` pairs and merges
//! neighbours that share a style. [`StyledTextBuilder::complete`] consumes
//! the builder and yields an immutable [`StyledText`].

use super::state::StyleState;

/// A maximal piece of text with one uniform style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleState,
}

/// Accumulates styled runs while text is being interpreted.
#[derive(Debug, Default)]
pub struct StyledTextBuilder {
    runs: Vec<StyledRun>,
}

impl StyledTextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text` under `style`.
    ///
    /// Text with the same style as the last run is concatenated onto it.
    /// An empty last run is replaced rather than kept in front of the new
    /// one.
    pub fn append(&mut self, text: &str, style: StyleState) {
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            Some(last) if last.text.is_empty() => {
                last.text.push_str(text);
                last.style = style;
                self.merge_tail();
            }
            _ => self.runs.push(StyledRun {
                text: text.to_string(),
                style,
            }),
        }
    }

    /// Merge the last run into its predecessor when their styles are equal.
    fn merge_tail(&mut self) {
        let len = self.runs.len();
        if len < 2 || self.runs[len - 2].style != self.runs[len - 1].style {
            return;
        }
        if let Some(last) = self.runs.pop() {
            self.runs[len - 2].text.push_str(&last.text);
        }
    }

    /// Finish construction.
    pub fn complete(mut self) -> StyledText {
        // Only the last run can be empty: any later append replaces it.
        if self.runs.last().is_some_and(|run| run.text.is_empty()) {
            self.runs.pop();
        }
        StyledText { runs: self.runs }
    }
}

/// Immutable sequence of styled runs; no two adjacent runs share a style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    /// Number of runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// The run at `index`, if any.
    pub fn run(&self, index: usize) -> Option<&StyledRun> {
        self.runs.get(index)
    }

    pub fn runs(&self) -> impl Iterator<Item = &StyledRun> {
        self.runs.iter()
    }

    /// The text of all runs concatenated, without any styling.
    pub fn full_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

impl IntoIterator for StyledText {
    type Item = StyledRun;
    type IntoIter = std::vec::IntoIter<StyledRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.into_iter()
    }
}
