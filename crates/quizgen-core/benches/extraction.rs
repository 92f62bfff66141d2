use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgen_core::extract::{extract_evaluation, extract_quiz, strip_code_fences};

fn bench_strip_fences(c: &mut Criterion) {
    let mut group = c.benchmark_group("strip_code_fences");

    let fenced = "Here is the quiz:\n\n```json\n[{\"question\":\"Q\",\"answer\":\"A\"}]\n```\n\nEnjoy!";

    let mixed = r#"Some notes first:

```python
print([1, 2, 3])
```

And the quiz:

```json
[{"question":"Q","answer":"A"}]
```
"#;

    let bare = "[{\"question\":\"Q\",\"answer\":\"A\"}]";

    group.bench_function("fenced", |b| {
        b.iter(|| strip_code_fences(black_box(fenced)))
    });

    group.bench_function("mixed", |b| b.iter(|| strip_code_fences(black_box(mixed))));

    group.bench_function("bare", |b| b.iter(|| strip_code_fences(black_box(bare))));

    group.finish();
}

fn bench_extract_quiz(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_quiz");

    let small = generate_quiz_reply(10);
    let medium = generate_quiz_reply(50);
    let large = generate_quiz_reply(200);

    group.bench_function("10_questions", |b| {
        b.iter(|| extract_quiz(black_box(&small)))
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| extract_quiz(black_box(&medium)))
    });

    group.bench_function("200_questions", |b| {
        b.iter(|| extract_quiz(black_box(&large)))
    });

    group.finish();
}

fn bench_extract_evaluation(c: &mut Criterion) {
    let reply = r#"Here is my evaluation: {"score":87,"feedback":"良い回答です","keyPoints":["A","B"],"missingPoints":["C"],"suggestions":"Cも触れましょう"} Hope that helps!"#;

    c.bench_function("extract_evaluation", |b| {
        b.iter(|| extract_evaluation(black_box(reply)))
    });
}

/// A fenced reply with `n` questions alternating between the two kinds.
fn generate_quiz_reply(n: usize) -> String {
    let mut items = Vec::with_capacity(n);
    for i in 0..n {
        if i % 2 == 0 {
            items.push(format!(
                r#"{{"type":"choice","question":"Question {i}?","choices":["a{i}","b{i}","c{i}","d{i}"],"answer":"b{i}"}}"#
            ));
        } else {
            items.push(format!(
                r#"{{"type":"text","question":"Explain {i}.","answer":"Because {i}.","keyPoints":["p{i}","q{i}"],"hint":"h{i}"}}"#
            ));
        }
    }
    format!("Sure, here is the quiz.\n\n```json\n[{}]\n```\n", items.join(",\n"))
}

criterion_group!(
    benches,
    bench_strip_fences,
    bench_extract_quiz,
    bench_extract_evaluation
);
criterion_main!(benches);
