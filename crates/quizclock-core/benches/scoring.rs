use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizclock_core::model::Difficulty;
use quizclock_core::scoring::{score_percent, Answers, Scorer};
use quizclock_core::{Answer, Question, QuestionBank, QuestionKind};

fn make_bank(n: usize) -> QuestionBank {
    let questions = (0..n)
        .map(|i| {
            let (kind, options, correct) = match i % 3 {
                0 => (
                    QuestionKind::MultiSelect,
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    Answer::multiple(["a", "c"]),
                ),
                1 => (
                    QuestionKind::SingleChoice,
                    vec!["a".into(), "b".into()],
                    Answer::single("b"),
                ),
                _ => (QuestionKind::ShortAnswer, vec![], Answer::single("answer")),
            };
            Question {
                id: format!("q{i}"),
                kind,
                prompt: format!("Question {i}"),
                options,
                correct_answer: correct,
                explanation: String::new(),
                difficulty: Difficulty::Medium,
                category: "bench".into(),
                points: 1 + (i % 5) as u32,
            }
        })
        .collect();
    QuestionBank::new(questions).unwrap()
}

/// Answer every other question correctly and the rest wrongly.
fn make_answers(bank: &QuestionBank) -> Answers {
    bank.iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = if i % 2 == 0 {
                q.correct_answer.clone()
            } else if q.kind.expects_set() {
                Answer::multiple(["b"])
            } else {
                Answer::single("wrong")
            };
            (q.id.clone(), answer)
        })
        .collect()
}

fn bench_score_percent(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_percent");

    group.bench_function("6_of_8", |b| {
        b.iter(|| score_percent(black_box(6), black_box(8)))
    });

    group.bench_function("333_of_1000", |b| {
        b.iter(|| score_percent(black_box(333), black_box(1000)))
    });

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let scorer = Scorer::default();

    for n in [10, 100, 1000] {
        let bank = make_bank(n);
        let answers = make_answers(&bank);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| scorer.score(black_box(&bank), black_box(&answers), black_box(42)))
        });
    }

    let bank = make_bank(100);
    let empty = Answers::new();
    group.bench_function("100_unanswered", |b| {
        b.iter(|| scorer.score(black_box(&bank), black_box(&empty), black_box(600)))
    });

    group.finish();
}

criterion_group!(benches, bench_score_percent, bench_score);
criterion_main!(benches);
