//! Weighted score aggregation over a year's subjects.
//!
//! Composite subjects never take a direct score: their value is the
//! coefficient-weighted mean of whichever sub-subjects have been scored.

use crate::model::year::{CombiMeta, SubjectMeta, Year};
use std::collections::HashMap;

/// Scores keyed by subject name.
pub type ScoreSheet = HashMap<String, f32>;

impl SubjectMeta {
    /// Returns the effective score of this subject, if any.
    ///
    /// Plain subjects read `scores[name]`. Composite subjects ignore any
    /// direct entry and derive their value from sub-subjects.
    pub fn score(&self, scores: &ScoreSheet) -> Option<f32> {
        match self.combi_meta.as_ref() {
            Some(combi) => combi.weighted_average(scores),
            None => scores.get(&self.name).copied(),
        }
    }
}

impl CombiMeta {
    /// Weighted mean of the scored sub-subjects.
    pub fn weighted_average(&self, scores: &ScoreSheet) -> Option<f32> {
        weighted_mean(
            self.subjects
                .iter()
                .filter_map(|subject| scores.get(&subject.name).map(|score| (*score, subject.coef))),
        )
    }
}

impl Year {
    /// Weighted mean over subjects that have a direct or derived score.
    ///
    /// Returns `None` when nothing contributes or all contributing weights
    /// are zero.
    pub fn weighted_average(&self, scores: &ScoreSheet) -> Option<f32> {
        weighted_mean(
            self.subjects
                .iter()
                .filter_map(|subject| subject.score(scores).map(|score| (score, subject.coef))),
        )
    }
}

fn weighted_mean(pairs: impl Iterator<Item = (f32, f32)>) -> Option<f32> {
    let (weighted_sum, total_weight) = pairs
        .fold((0.0_f32, 0.0_f32), |(sum, weight), (score, coef)| {
            (sum + score * coef, weight + coef)
        });
    if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreSheet;
    use crate::model::year::{CombiMeta, SubjectMeta, Year};

    fn sheet(entries: &[(&str, f32)]) -> ScoreSheet {
        entries
            .iter()
            .map(|(name, score)| ((*name).to_string(), *score))
            .collect()
    }

    fn arts_year() -> Year {
        Year::new(
            "3ME",
            vec![
                SubjectMeta::composite(
                    "Artistique",
                    4.0,
                    CombiMeta::new(vec![
                        SubjectMeta::new("Dessin", 1.0),
                        SubjectMeta::new("Graphisme", 1.0),
                        SubjectMeta::new("HistoArt", 1.0),
                    ]),
                ),
                SubjectMeta::new("Français", 3.0),
                SubjectMeta::new("EduPhys", 1.0),
            ],
        )
    }

    #[test]
    fn composite_score_is_mean_of_scored_parts() {
        let year = arts_year();
        let scores = sheet(&[("Dessin", 50.0), ("Graphisme", 40.0), ("Artistique", 1.0)]);
        let art = year.subject("Artistique").unwrap();
        assert_eq!(art.score(&scores), Some(45.0));
    }

    #[test]
    fn year_average_weights_by_top_level_coef() {
        let year = arts_year();
        let scores = sheet(&[
            ("Dessin", 40.0),
            ("Graphisme", 40.0),
            ("HistoArt", 40.0),
            ("Français", 20.0),
        ]);
        // (40 * 4 + 20 * 3) / 7
        let average = year.weighted_average(&scores).unwrap();
        assert!((average - 220.0 / 7.0).abs() < 1e-4);
    }

    #[test]
    fn average_is_none_without_scores() {
        assert_eq!(arts_year().weighted_average(&ScoreSheet::new()), None);
    }

    #[test]
    fn zero_weight_subjects_do_not_produce_an_average() {
        let year = Year::new("x", vec![SubjectMeta::new("Option", 0.0)]);
        let scores = sheet(&[("Option", 55.0)]);
        assert_eq!(year.weighted_average(&scores), None);
    }
}
