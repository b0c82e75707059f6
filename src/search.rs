use crate::document::DocumentRef;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

#[derive(Debug, Default)]
pub struct SearchState {
    /// Query input has focus.
    pub is_active: bool,
    pub query: String,
    /// Indices into the document list, best match first.
    pub matches: Vec<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.is_active = true;
        self.query.clear();
        self.matches.clear();
    }

    /// Leaves the input but keeps the current filter applied.
    pub fn finish_input(&mut self) {
        self.is_active = false;
    }

    pub fn exit(&mut self) {
        self.is_active = false;
        self.query.clear();
        self.matches.clear();
    }

    pub fn is_filtering(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn update_matches(&mut self, documents: &[DocumentRef]) {
        if self.query.is_empty() {
            self.matches.clear();
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize)> = documents
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| {
                let by_name = matcher.fuzzy_match(doc.display_name(), &self.query);
                let by_id = matcher.fuzzy_match(&doc.id, &self.query);
                by_name.max(by_id).map(|score| (score, idx))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        self.matches = scored.into_iter().map(|(_, idx)| idx).collect();
    }
}
