use bounce::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn alphabet() -> impl Iterator<Item = Parser<char, char>> {
    ('A'..='Z').map(just)
}

fn bench_choice(c: &mut Criterion) {
    let alphabet_choice = choice(alphabet()).unwrap();

    let mut group = c.benchmark_group("choice");

    for src in ["A", "Z"] {
        let input = Input::from(src);
        group.bench_function(BenchmarkId::new("choice(A..Z)", src), |b| {
            b.iter(|| {
                black_box(alphabet_choice.parse(black_box(input.clone())))
                    .into_result()
                    .unwrap();
            })
        });
    }

    let input = Input::from("0");
    group.bench_function(BenchmarkId::new("choice(A..Z)", "0"), |b| {
        b.iter(|| {
            assert!(black_box(alphabet_choice.parse(black_box(input.clone())))
                .into_result()
                .is_err());
        })
    });
}

fn bench_sequence(c: &mut Criterion) {
    let alphabet_sequence = sequence(alphabet());
    let input = Input::from("ABCDEFGHIJKLMNOPQRSTUVWXYZ");

    c.bench_function("sequence(A..Z)", |b| {
        b.iter(|| {
            black_box(alphabet_sequence.parse(black_box(input.clone())))
                .into_result()
                .unwrap();
        })
    });
}

fn bench_many(c: &mut Criterion) {
    let mut group = c.benchmark_group("many");

    for len in [100, 10_000] {
        let input = Input::from("a".repeat(len));
        let letters = text::letter().many();
        group.bench_with_input(BenchmarkId::new("letter().many()", len), &input, |b, input| {
            b.iter(|| {
                black_box(letters.parse(black_box(input.clone())))
                    .into_result()
                    .unwrap();
            })
        });
    }
}

fn bench_arithmetic(c: &mut Criterion) {
    type Op = fn(i64, i64) -> i64;

    let expr = recursive(|expr| {
        let atom = text::number().or(expr.between(just('('), just(')'))).padded();
        let product = atom.chainl1(just('*').to((|a: i64, b: i64| a * b) as Op));
        product.chainl1(
            just('+')
                .to((|a: i64, b: i64| a + b) as Op)
                .or(just('-').to((|a: i64, b: i64| a - b) as Op)),
        )
    })
    .then_ignore(eof());

    let src = vec!["(1 + 2 * 3 - 4)"; 500].join(" * ");
    let input = Input::from(src);

    c.bench_function("arithmetic", |b| {
        b.iter(|| {
            black_box(expr.parse(black_box(input.clone())))
                .into_result()
                .unwrap();
        })
    });
}

criterion_group!(benches, bench_choice, bench_sequence, bench_many, bench_arithmetic);
criterion_main!(benches);
