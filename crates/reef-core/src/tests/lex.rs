use crate::parser::lex::{lex, Tok};
use crate::{Direction, Error};

fn toks(input: &str) -> Vec<Tok> {
    lex(input).unwrap().into_iter().map(|t| t.tok).collect()
}

#[test]
fn lexes_a_canvas_header() {
    assert_eq!(
        toks("canvas LR"),
        vec![Tok::Canvas, Tok::Direction(Direction::LR)]
    );
}

#[test]
fn lexes_block_declaration_tokens() {
    assert_eq!(
        toks("@shape a \"A node\""),
        vec![
            Tok::At,
            Tok::Ident("shape".into()),
            Tok::Ident("a".into()),
            Tok::Str("A node".into()),
        ]
    );
}

#[test]
fn uuid_shaped_id_is_one_identifier() {
    assert_eq!(
        toks("550e8400-e29b-41d4-a716-446655440000"),
        vec![Tok::Ident("550e8400-e29b-41d4-a716-446655440000".into())]
    );
}

#[test]
fn hyphenated_id_is_one_identifier() {
    assert_eq!(
        toks("my-node -> other-node"),
        vec![
            Tok::Ident("my-node".into()),
            Tok::Arrow,
            Tok::Ident("other-node".into()),
        ]
    );
}

#[test]
fn patch_keywords_win_over_identifiers() {
    assert_eq!(toks("update"), vec![Tok::Update]);
    assert_eq!(toks("delete add"), vec![Tok::Delete, Tok::Add]);
}

#[test]
fn keyword_prefix_is_still_an_identifier() {
    assert_eq!(toks("updated"), vec![Tok::Ident("updated".into())]);
    assert_eq!(toks("LRx"), vec![Tok::Ident("LRx".into())]);
    assert_eq!(toks("canvasy"), vec![Tok::Ident("canvasy".into())]);
}

#[test]
fn numbers_and_negatives() {
    assert_eq!(
        toks("{x: -12.5, y: 40}"),
        vec![
            Tok::LBrace,
            Tok::Ident("x".into()),
            Tok::Colon,
            Tok::Num(-12.5),
            Tok::Comma,
            Tok::Ident("y".into()),
            Tok::Colon,
            Tok::Num(40.0),
            Tok::RBrace,
        ]
    );
}

#[test]
fn booleans_are_literals() {
    assert_eq!(toks("true false"), vec![Tok::Bool(true), Tok::Bool(false)]);
}

#[test]
fn line_and_column_are_tracked() {
    let tokens = lex("canvas LR\n@shape a \"A\"").unwrap();
    let at = tokens.iter().find(|t| t.tok == Tok::At).unwrap();
    assert_eq!((at.line, at.column), (2, 1));
    let id = tokens
        .iter()
        .find(|t| t.tok == Tok::Ident("a".into()))
        .unwrap();
    assert_eq!((id.line, id.column), (2, 8));
}

#[test]
fn unexpected_character_is_a_positioned_error() {
    let err = lex("canvas LR\n  %").unwrap_err();
    match err {
        Error::Lex {
            line,
            column,
            found,
        } => {
            assert_eq!((line, column, found), (2, 3, '%'));
        }
        other => panic!("expected lex error, got {other:?}"),
    }
}

#[test]
fn unterminated_string_is_reported_at_the_opening_quote() {
    let err = lex("@shape a \"oops").unwrap_err();
    match err {
        Error::UnterminatedString { line, column } => {
            assert_eq!((line, column), (1, 10));
        }
        other => panic!("expected unterminated string error, got {other:?}"),
    }
}

#[test]
fn strings_may_span_punctuation() {
    assert_eq!(
        toks("\"a -> b: {ok}\""),
        vec![Tok::Str("a -> b: {ok}".into())]
    );
}
