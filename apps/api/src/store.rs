use std::cmp::Ordering;

use uuid::Uuid;

use crate::models::candidate::{Candidate, Recalibration};
use crate::models::progress::{ProcessingStatus, Progress};
use crate::models::role::{CategorySet, Role};

/// The session store: one active role, the ranked candidate list, and batch
/// progress. All request handlers share one instance behind
/// `Arc<tokio::sync::RwLock<Store>>`, so every mutation point is a named
/// method here rather than ambient process state.
///
/// Nothing is persisted; the whole session dies with the process.
#[derive(Debug, Default)]
pub struct Store {
    role: Option<Role>,
    candidates: Vec<Candidate>,
    progress: Progress,
}

impl Store {
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Installs a new role, replacing any previous one. The candidate list
    /// from an earlier session is left in place until the next batch clears
    /// it (matching the no-rollback batch semantics).
    pub fn replace_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    /// Replaces the active role's category set. Returns the updated role, or
    /// `None` when no role has been saved yet.
    pub fn set_categories(&mut self, categories: CategorySet) -> Option<Role> {
        let role = self.role.as_mut()?;
        role.categories = categories;
        Some(role.clone())
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Starts a batch: resets progress and clears the candidate list.
    /// Returns `false` when a batch is already running, in which case nothing
    /// is touched — concurrent batches are rejected, not interleaved.
    pub fn begin_batch(&mut self, total: usize) -> bool {
        if self.progress.status == ProcessingStatus::Processing {
            return false;
        }
        self.progress = Progress::start(total);
        self.candidates.clear();
        true
    }

    /// Marks the batch as working on the given file (1-based position).
    pub fn set_current_file(&mut self, index: usize, filename: &str) {
        self.progress.current = index;
        self.progress.current_file = filename.to_string();
    }

    pub fn push_candidate(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Sorts candidates by overall score descending (stable, so equal scores
    /// keep input order) and marks the batch complete. Called exactly once
    /// per batch; the list is never re-sorted afterwards, so recalibration
    /// does not reorder it.
    pub fn finish_batch(&mut self) {
        self.candidates.sort_by(|a, b| {
            b.ranking
                .overall_score
                .partial_cmp(&a.ranking.overall_score)
                .unwrap_or(Ordering::Equal)
        });
        self.progress.status = ProcessingStatus::Complete;
        self.progress.current_file.clear();
    }

    pub fn fail_batch(&mut self) {
        self.progress.status = ProcessingStatus::Error;
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidate(&self, id: Uuid) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    /// Sets the reviewed flag. Returns `false` for an unknown id.
    pub fn mark_reviewed(&mut self, id: Uuid) -> bool {
        match self.candidate_mut(id) {
            Some(candidate) => {
                candidate.reviewed = true;
                true
            }
            None => false,
        }
    }

    /// Stores interview notes on a candidate uncoupled from the follow-up
    /// model call, so notes survive even if recalibration fails.
    pub fn set_notes(&mut self, id: Uuid, notes: &str) -> bool {
        match self.candidate_mut(id) {
            Some(candidate) => {
                candidate.interview_notes = notes.to_string();
                true
            }
            None => false,
        }
    }

    /// Attaches a recalibration, replacing any previous one.
    pub fn set_recalibration(&mut self, id: Uuid, recalibration: Recalibration) -> bool {
        match self.candidate_mut(id) {
            Some(candidate) => {
                candidate.recalibration = Some(recalibration);
                true
            }
            None => false,
        }
    }

    fn candidate_mut(&mut self, id: Uuid) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::Ranking;
    use crate::models::role::{MainCategory, SubCategory};
    use std::collections::BTreeMap;

    fn ranking(score: f64) -> Ranking {
        Ranking {
            overall_score: score,
            main_category_scores: BTreeMap::new(),
            sub_category_scores: BTreeMap::new(),
            summary: String::new(),
            red_flags: vec![],
            interview_questions: (0..10).map(|i| format!("Q{i}?")).collect(),
            ai_feedback: String::new(),
        }
    }

    fn candidate(name: &str, score: f64) -> Candidate {
        Candidate::new(name.to_string(), "some extracted text", ranking(score))
    }

    #[test]
    fn test_replace_role_overwrites_previous() {
        let mut store = Store::default();
        store.replace_role(Role::new("First".into(), "".into(), "".into()));
        store.replace_role(Role::new("Second".into(), "".into(), "".into()));
        assert_eq!(store.role().unwrap().title, "Second");
    }

    #[test]
    fn test_set_categories_requires_role() {
        let mut store = Store::default();
        assert!(store.set_categories(CategorySet::default()).is_none());
        store.replace_role(Role::new("Engineer".into(), "".into(), "".into()));
        assert!(store.set_categories(CategorySet::default()).is_some());
    }

    #[test]
    fn test_set_categories_round_trips_the_submitted_set() {
        let mut store = Store::default();
        store.replace_role(Role::new("Engineer".into(), "".into(), "".into()));

        let submitted = CategorySet {
            main_categories: vec![
                MainCategory {
                    name: "Technical Skills".into(),
                    description: "Depth in the required stack".into(),
                    weight: 60,
                },
                MainCategory {
                    name: "Communication".into(),
                    description: "Clarity of written materials".into(),
                    weight: 40,
                },
            ],
            sub_categories: vec![SubCategory {
                name: "Rust".into(),
                main_category: "Technical Skills".into(),
                description: "Systems-level Rust work".into(),
            }],
            evaluation_guidance: "Weigh recent experience over older roles.".into(),
        };

        let role = store.set_categories(submitted.clone()).unwrap();
        assert_eq!(role.categories, submitted);
        assert_eq!(store.role().unwrap().categories, submitted);
    }

    #[test]
    fn test_begin_batch_clears_candidates_and_rejects_reentry() {
        let mut store = Store::default();
        store.push_candidate(candidate("old.pdf", 50.0));

        assert!(store.begin_batch(3));
        assert!(store.candidates().is_empty());
        assert_eq!(store.progress().total, 3);

        // Second batch while processing must be refused and leave state alone.
        assert!(!store.begin_batch(5));
        assert_eq!(store.progress().total, 3);
    }

    #[test]
    fn test_finish_batch_sorts_descending_and_is_stable() {
        let mut store = Store::default();
        assert!(store.begin_batch(4));
        store.push_candidate(candidate("b.pdf", 70.0));
        store.push_candidate(candidate("a.pdf", 90.0));
        store.push_candidate(candidate("tie1.pdf", 80.0));
        store.push_candidate(candidate("tie2.pdf", 80.0));
        store.finish_batch();

        let names: Vec<&str> = store
            .candidates()
            .iter()
            .map(|c| c.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.pdf", "tie1.pdf", "tie2.pdf", "b.pdf"]);
        assert_eq!(store.progress().status, ProcessingStatus::Complete);
    }

    #[test]
    fn test_batch_allowed_again_after_completion() {
        let mut store = Store::default();
        assert!(store.begin_batch(1));
        store.finish_batch();
        assert!(store.begin_batch(2));
    }

    #[test]
    fn test_recalibration_replaces_previous_and_ranking_untouched() {
        let mut store = Store::default();
        store.push_candidate(candidate("cv.pdf", 75.0));
        let id = store.candidates()[0].id;

        let first = Recalibration {
            recalibrated_score: 80.0,
            score_adjustment: 5.0,
            adjustment_reason: "good interview".into(),
            updated_assessment: "solid".into(),
        };
        let second = Recalibration {
            recalibrated_score: 60.0,
            score_adjustment: -15.0,
            adjustment_reason: "weak system design round".into(),
            updated_assessment: "reconsider".into(),
        };

        assert!(store.set_recalibration(id, first));
        assert!(store.set_recalibration(id, second));

        let candidate = store.candidate(id).unwrap();
        let recal = candidate.recalibration.as_ref().unwrap();
        assert_eq!(recal.recalibrated_score, 60.0);
        assert_eq!(recal.adjustment_reason, "weak system design round");
        // Original ranking is immutable under recalibration.
        assert_eq!(candidate.ranking.overall_score, 75.0);
    }

    #[test]
    fn test_mutations_on_unknown_id_return_false() {
        let mut store = Store::default();
        let id = Uuid::new_v4();
        assert!(!store.mark_reviewed(id));
        assert!(!store.set_notes(id, "notes"));
    }
}
