use bounce::prelude::*;

type Op = fn(i64, i64) -> i64;

fn op(c: char, f: Op) -> Parser<char, Op> {
    just(c).to(f)
}

/// All four operators at one precedence level, folded left to right.
fn flat() -> Parser<char, i64> {
    let expr = Ref::named("expr");
    let operator = choice(vec![
        op('+', |a, b| a + b),
        op('-', |a, b| a - b),
        op('*', |a, b| a * b),
        op('/', |a, b| a / b),
    ])
    .unwrap();
    let term = text::number().or(expr.parser().between(just('('), just(')')));
    expr.set(term.chainl1(operator)).unwrap();
    expr.parser()
}

/// The usual precedence: `*` and `/` bind tighter than `+` and `-`, and `^` is right-associative.
fn precedence() -> Parser<char, i64> {
    recursive(|expr| {
        let atom = text::integer()
            .or(expr.between(just('('), just(')')))
            .padded();
        let power = atom.chainr1(op('^', |a, b| a.pow(b as u32)));
        let product = power.chainl1(op('*', |a, b| a * b).or(op('/', |a, b| a / b)));
        product.chainl1(op('+', |a, b| a + b).or(op('-', |a, b| a - b)))
    })
    .then_ignore(eof())
}

#[test]
fn flat_calculator() {
    let calc = flat();
    assert_eq!(calc.parse("3+(2*4)-5").into_result(), Ok(6));
    assert_eq!(calc.parse("2+3*4").into_result(), Ok(20));
    assert_eq!(calc.parse("((((7))))").into_result(), Ok(7));
}

#[test]
fn precedence_calculator() {
    let calc = precedence();
    assert_eq!(calc.parse("2 + 3 * 4").into_result(), Ok(14));
    assert_eq!(calc.parse("(2 + 3) * 4").into_result(), Ok(20));
    assert_eq!(calc.parse("2 ^ 3 ^ 2").into_result(), Ok(512));
    assert_eq!(calc.parse("100 / 10 / 5").into_result(), Ok(2));
    assert_eq!(calc.parse("-3 * -3").into_result(), Ok(9));
}

#[test]
fn calculator_errors() {
    let calc = precedence();
    assert!(calc.parse("").is_failure());
    assert!(calc.parse("1 +").is_failure());

    let err = calc.parse("(1 + 2").into_result().unwrap_err();
    assert_eq!(err.position(), 6);
    assert_eq!(err.to_string(), "closing delimiter: expected ')', found end of input at position 6");
}

#[test]
fn long_expression() {
    let src = vec!["1"; 10_000].join("+");
    assert_eq!(flat().parse(src).into_result(), Ok(10_000));
}
