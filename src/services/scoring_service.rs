use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::admin_dto::ProgressDistribution;
use crate::models::quiz::QuestionWithOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub correct_count: i32,
    pub total_questions: i32,
    /// Integer percentage in [0, 100], rounded half-up.
    pub score: i32,
}

pub struct ScoringService;

impl ScoringService {
    /// Scores a submitted answer map against the quiz's questions.
    ///
    /// An answer counts as correct when the chosen option id matches the
    /// question's option flagged correct. Unanswered questions count as
    /// incorrect. A quiz with no questions scores 0.
    pub fn score_quiz(
        questions: &[QuestionWithOptions],
        answers: &HashMap<Uuid, Uuid>,
    ) -> ScoreBreakdown {
        let total_questions = questions.len() as i32;
        let mut correct_count = 0;

        for question in questions {
            let selected = answers.get(&question.id);
            let correct = question.options.iter().find(|opt| opt.is_correct);
            if let (Some(selected_id), Some(correct_opt)) = (selected, correct) {
                if *selected_id == correct_opt.id {
                    correct_count += 1;
                }
            }
        }

        ScoreBreakdown {
            correct_count,
            total_questions,
            score: Self::percentage(correct_count as i64, total_questions as i64),
        }
    }

    /// round-half-up(100 * part / whole); 0 when the whole is empty.
    pub fn percentage(part: i64, whole: i64) -> i32 {
        if whole <= 0 {
            return 0;
        }
        ((part as f64 / whole as f64) * 100.0).round() as i32
    }

    /// Buckets per-user completed-lesson counts into {0%, 1-99%, 100%}.
    ///
    /// One entry per user, 0 for users with no progress rows. A count at or
    /// above `total_lessons` lands in the completed bucket, so users who
    /// finished before lessons were removed still read as done.
    pub fn distribution<I>(total_lessons: i64, completed_counts: I) -> ProgressDistribution
    where
        I: IntoIterator<Item = i64>,
    {
        let mut dist = ProgressDistribution::default();
        for completed in completed_counts {
            if completed == 0 {
                dist.zero += 1;
            } else if completed >= total_lessons {
                dist.completed += 1;
            } else {
                dist.in_progress += 1;
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::QuestionOption;

    fn question(correct_of: usize, option_count: usize) -> QuestionWithOptions {
        let quiz_id = Uuid::new_v4();
        let id = Uuid::new_v4();
        let options = (0..option_count)
            .map(|i| QuestionOption {
                id: Uuid::new_v4(),
                question_id: id,
                text: format!("option {}", i),
                is_correct: i == correct_of,
            })
            .collect();
        QuestionWithOptions {
            id,
            quiz_id,
            text: "q".into(),
            options,
        }
    }

    fn answer_correctly(q: &QuestionWithOptions) -> (Uuid, Uuid) {
        let correct = q.options.iter().find(|o| o.is_correct).unwrap();
        (q.id, correct.id)
    }

    fn answer_wrong(q: &QuestionWithOptions) -> (Uuid, Uuid) {
        let wrong = q.options.iter().find(|o| !o.is_correct).unwrap();
        (q.id, wrong.id)
    }

    #[test]
    fn one_of_two_correct_scores_fifty() {
        let questions = vec![question(0, 3), question(1, 3)];
        let answers: HashMap<_, _> = vec![
            answer_correctly(&questions[0]),
            answer_wrong(&questions[1]),
        ]
        .into_iter()
        .collect();

        let breakdown = ScoringService::score_quiz(&questions, &answers);
        assert_eq!(breakdown.correct_count, 1);
        assert_eq!(breakdown.total_questions, 2);
        assert_eq!(breakdown.score, 50);
    }

    #[test]
    fn two_of_three_rounds_half_up_to_sixty_seven() {
        let questions = vec![question(0, 4), question(1, 4), question(2, 4)];
        let answers: HashMap<_, _> = vec![
            answer_correctly(&questions[0]),
            answer_correctly(&questions[1]),
            answer_wrong(&questions[2]),
        ]
        .into_iter()
        .collect();

        assert_eq!(ScoringService::score_quiz(&questions, &answers).score, 67);
    }

    #[test]
    fn empty_quiz_scores_zero_without_panicking() {
        let answers = HashMap::new();
        let breakdown = ScoringService::score_quiz(&[], &answers);
        assert_eq!(breakdown.score, 0);
        assert_eq!(breakdown.total_questions, 0);
    }

    #[test]
    fn unanswered_questions_count_as_incorrect() {
        let questions = vec![question(0, 2), question(0, 2)];
        let answers: HashMap<_, _> =
            vec![answer_correctly(&questions[0])].into_iter().collect();
        assert_eq!(ScoringService::score_quiz(&questions, &answers).score, 50);
    }

    #[test]
    fn answer_to_foreign_question_is_ignored() {
        let questions = vec![question(0, 2)];
        let answers: HashMap<_, _> = vec![(Uuid::new_v4(), Uuid::new_v4())]
            .into_iter()
            .collect();
        assert_eq!(
            ScoringService::score_quiz(&questions, &answers).correct_count,
            0
        );
    }

    #[test]
    fn percentage_half_ties_round_up() {
        // 1/8 = 12.5 -> 13
        assert_eq!(ScoringService::percentage(1, 8), 13);
        assert_eq!(ScoringService::percentage(0, 5), 0);
        assert_eq!(ScoringService::percentage(5, 5), 100);
        assert_eq!(ScoringService::percentage(2, 3), 67);
    }

    #[test]
    fn percentage_of_empty_whole_is_zero() {
        assert_eq!(ScoringService::percentage(0, 0), 0);
        assert_eq!(ScoringService::percentage(3, 0), 0);
    }

    #[test]
    fn distribution_buckets_users() {
        let dist = ScoringService::distribution(4, vec![0, 1, 3, 4, 4, 0]);
        assert_eq!(dist.zero, 2);
        assert_eq!(dist.in_progress, 2);
        assert_eq!(dist.completed, 2);
    }

    #[test]
    fn distribution_counts_overshoot_as_completed() {
        // Lessons removed after users finished: count exceeds the total.
        let dist = ScoringService::distribution(2, vec![3]);
        assert_eq!(dist.completed, 1);
    }

    #[test]
    fn distribution_with_zero_lessons_keeps_idle_users_at_zero() {
        let dist = ScoringService::distribution(0, vec![0, 0]);
        assert_eq!(dist.zero, 2);
        assert_eq!(dist.completed, 0);
    }
}
