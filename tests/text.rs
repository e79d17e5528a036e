use bounce::prelude::*;
use std::io::Cursor;

#[test]
fn digit_and_number() {
    assert_eq!(text::digit().parse("5").into_result(), Ok('5'));
    assert_eq!(text::number().parse("12345").into_result(), Ok(12345));
}

#[test]
fn key_value_pairs() {
    let key = text::ident();
    let value = text::integer().map(|n| n.to_string()).or(text::word());
    let pair = key.then_ignore(just('=').padded()).then(value);
    let pairs = pair.sep_by(just(';').padded()).then_ignore(eof());

    let parsed = pairs
        .parse("width = 80; mode=fast ;offset= -4")
        .into_result()
        .unwrap()
        .into_vec();
    assert_eq!(
        parsed,
        vec![
            ("width".to_string(), "80".to_string()),
            ("mode".to_string(), "fast".to_string()),
            ("offset".to_string(), "-4".to_string()),
        ]
    );
}

#[test]
fn string_is_exact() {
    let p = text::string("true").to(true).or(text::string("false").to(false));
    assert_eq!(p.parse("false").into_result(), Ok(false));
    let err = p.parse("trap").into_result().unwrap_err();
    assert_eq!(err.position(), 2);
}

#[test]
fn input_from_reader() {
    let input = Input::from_reader(Cursor::new("héllo wörld")).unwrap();
    assert_eq!(input.len(), 11);
    let words = text::word().sep_by(text::space()).parse(input).into_result().unwrap();
    assert_eq!(words.into_vec(), vec!["héllo".to_string(), "wörld".to_string()]);
}

#[test]
fn keywords_and_identifiers() {
    let stmt = text::keyword("let")
        .ignore_then(text::ident().padded())
        .then_ignore(just('='))
        .then(text::number().padded());

    assert_eq!(stmt.parse("let x = 5").into_result(), Ok(("x".to_string(), 5)));
    assert!(stmt.parse("letx = 5").is_failure());
}
