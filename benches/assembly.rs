//! Benchmarks for the exam assembly pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use izpit::{
    AnswerChoice, ExamDescriptor, Question, QuestionBank, QuestionBody, TemplateLibrary, assemble,
    parse_exam, select,
};

fn large_bank(size: usize) -> QuestionBank {
    let mut bank = QuestionBank::new();
    for i in 0..size {
        let correct = i % 4;
        let choices = (0..4)
            .map(|c| {
                let choice =
                    AnswerChoice::new(format!("c{c}"), format!("answer {c} to question {i}"));
                if c == correct {
                    AnswerChoice {
                        correct: true,
                        ..choice
                    }
                } else {
                    choice
                }
            })
            .collect();
        bank.add_question(Question::new(
            format!("q{i}"),
            format!("What is the value of parameter {i} in the reference circuit?"),
            QuestionBody::SingleChoice(choices),
        ));
    }
    bank
}

fn descriptor_xml(size: usize) -> String {
    let mut doc = String::from(
        "<exam>\n<title>Benchmark</title>\n<language>english</language>\n<variants>4</variants>\n<seed>42</seed>\n<questions>\n",
    );
    for i in 0..size {
        doc.push_str(&format!(
            "<question id=\"q{i}\"><text>Question {i}?</text><choose-single>\
             <correct-choice>right</correct-choice><choice>wrong</choice>\
             <choice>other</choice></choose-single></question>\n"
        ));
    }
    doc.push_str("</questions>\n</exam>\n");
    doc
}

fn bench_parse(c: &mut Criterion) {
    let doc = descriptor_xml(200);
    c.bench_function("parse_200_questions", |b| {
        b.iter(|| parse_exam(&doc).unwrap());
    });
}

fn bench_select(c: &mut Criterion) {
    let bank = large_bank(200);
    let descriptor = ExamDescriptor::new("Benchmark")
        .with_variants(10)
        .with_question_count(50)
        .with_seed(42);

    c.bench_function("select_10x50_of_200", |b| {
        b.iter(|| select(&bank, &descriptor).unwrap());
    });
}

fn bench_assemble(c: &mut Criterion) {
    let bank = large_bank(200);
    let descriptor = ExamDescriptor::new("Benchmark")
        .with_variants(10)
        .with_question_count(50)
        .with_seed(42);
    let library = TemplateLibrary::builtin();

    c.bench_function("assemble_10x50_of_200", |b| {
        b.iter(|| assemble(&bank, &descriptor, &library).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_select, bench_assemble);
criterion_main!(benches);
