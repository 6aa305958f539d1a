//! Per-category and per-difficulty breakdown of a result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::model::Difficulty;
use crate::scoring::{score_percent, QuestionOutcome, QuizResult};

/// Tally for one group of questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total: usize,
    pub correct: usize,
    pub answered: usize,
    pub points_earned: u32,
    pub points_possible: u32,
}

impl GroupStats {
    /// Count-based percentage, rounded like the overall score.
    pub fn percent(&self) -> u8 {
        score_percent(self.correct, self.total)
    }
}

/// Breakdown of a result across question groupings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub per_category: BTreeMap<String, GroupStats>,
    pub per_difficulty: BTreeMap<Difficulty, GroupStats>,
    /// Questions with an answer whose shape did not fit the question type.
    pub mismatched: Vec<String>,
    pub unanswered: Vec<String>,
}

impl Breakdown {
    /// The category with the lowest percentage, if any question was missed.
    pub fn weakest_category(&self) -> Option<(&str, &GroupStats)> {
        self.per_category
            .iter()
            .filter(|(_, s)| s.correct < s.total)
            .min_by_key(|(_, s)| s.percent())
            .map(|(name, stats)| (name.as_str(), stats))
    }
}

/// Group a result's outcomes by the bank's categories and difficulties.
///
/// Outcomes for questions missing from `bank` are skipped.
pub fn compute_breakdown(bank: &QuestionBank, result: &QuizResult) -> Breakdown {
    let mut breakdown = Breakdown::default();

    for outcome in &result.outcomes {
        let Some(question) = bank.get(&outcome.question_id) else {
            tracing::debug!("outcome for unknown question {}", outcome.question_id);
            continue;
        };

        let category = breakdown
            .per_category
            .entry(question.category.clone())
            .or_default();
        tally(category, question.points, outcome);
        let difficulty = breakdown
            .per_difficulty
            .entry(question.difficulty)
            .or_default();
        tally(difficulty, question.points, outcome);

        if outcome.mismatch {
            breakdown.mismatched.push(outcome.question_id.clone());
        }
        if !outcome.answered {
            breakdown.unanswered.push(outcome.question_id.clone());
        }
    }

    breakdown
}

fn tally(stats: &mut GroupStats, points: u32, outcome: &QuestionOutcome) {
    stats.total += 1;
    stats.points_possible += points;
    if outcome.answered {
        stats.answered += 1;
    }
    if outcome.correct {
        stats.correct += 1;
        stats.points_earned += outcome.points_awarded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Question, QuestionKind};
    use crate::scoring::{score, Answers};

    fn q(id: &str, category: &str, difficulty: Difficulty, points: u32) -> Question {
        Question {
            id: id.into(),
            kind: QuestionKind::ShortAnswer,
            prompt: String::new(),
            options: vec![],
            correct_answer: Answer::single("yes"),
            explanation: String::new(),
            difficulty,
            category: category.into(),
            points,
        }
    }

    #[test]
    fn groups_by_category_and_difficulty() {
        let bank = QuestionBank::new(vec![
            q("t1", "types", Difficulty::Easy, 1),
            q("t2", "types", Difficulty::Hard, 3),
            q("l1", "loops", Difficulty::Easy, 2),
            q("l2", "loops", Difficulty::Easy, 2),
        ])
        .unwrap();
        let mut answers = Answers::new();
        answers.insert("t1".into(), Answer::single("yes"));
        answers.insert("t2".into(), Answer::single("yes"));
        answers.insert("l1".into(), Answer::single("no"));
        answers.insert("l2".into(), Answer::multiple(["yes"]));

        let result = score(&bank, &answers, 0);
        let breakdown = compute_breakdown(&bank, &result);

        let types = &breakdown.per_category["types"];
        assert_eq!((types.correct, types.total), (2, 2));
        assert_eq!(types.points_earned, 4);
        assert_eq!(types.percent(), 100);

        let loops = &breakdown.per_category["loops"];
        assert_eq!((loops.correct, loops.total, loops.answered), (0, 2, 2));

        let easy = &breakdown.per_difficulty[&Difficulty::Easy];
        assert_eq!((easy.correct, easy.total), (1, 3));
        assert_eq!(easy.points_possible, 5);

        assert_eq!(breakdown.mismatched, vec!["l2"]);
        assert!(breakdown.unanswered.is_empty());
        assert_eq!(breakdown.weakest_category().unwrap().0, "loops");
    }

    #[test]
    fn perfect_result_has_no_weakest_category() {
        let bank = QuestionBank::new(vec![q("a", "x", Difficulty::Medium, 1)]).unwrap();
        let mut answers = Answers::new();
        answers.insert("a".into(), Answer::single("yes"));
        let breakdown = compute_breakdown(&bank, &score(&bank, &answers, 0));
        assert!(breakdown.weakest_category().is_none());
    }
}
