use super::prelude::*;
use crate::environment::prelude::{Arity, CallError, Registry};
use crate::utils::prelude::SrcSpan;

fn check_tokens(input: &str, registry: &Registry, tokens: Vec<Token>) -> std::result::Result<(), LexicalError> {
    let mut lexer = Lexer::for_source(input, registry);

    for (idx, token) in tokens.iter().enumerate() {
        let next_token = lexer.next_token()?;

        assert_eq!(*token, next_token,
            "Next token does not match expected token ({:?}, {:?}) at {}", token, next_token, idx
        );
    }

    Ok(())
}

fn check_error(input: &str, expected: LexicalError) {
    let registry = Registry::standard();

    match scan(input, &registry) {
        Ok(tokens) => panic!("Expected {:?} for {:?}, got tokens {:?}", expected, input, tokens),
        Err(err) => assert_eq!(err, expected, "Wrong error for {:?}", input),
    }
}

#[test]
fn test_numbers() -> std::result::Result<(), LexicalError> {
    let input = "10 1.5  0.0625 007";

    let tokens = vec![
        Token::new(TokenKind::Number, "10", SrcSpan::from(0, 2)),
        Token::new(TokenKind::Number, "1.5", SrcSpan::from(3, 6)),
        Token::new(TokenKind::Number, "0.0625", SrcSpan::from(8, 14)),
        Token::new(TokenKind::Number, "007", SrcSpan::from(15, 18)),
        Token::new(TokenKind::Eof, "", SrcSpan::from(18, 18)),
    ];

    check_tokens(input, &Registry::standard(), tokens)
}

#[test]
fn test_operators() -> std::result::Result<(), LexicalError> {
    let input = "+-*/^()&|=,! != > >= < <=";

    let kinds = vec![
        TokenKind::Plus, TokenKind::Minus, TokenKind::Mul, TokenKind::Div, TokenKind::Pow,
        TokenKind::LParen, TokenKind::RParen, TokenKind::And, TokenKind::Or, TokenKind::Equal,
        TokenKind::Comma, TokenKind::Not, TokenKind::NotEqual, TokenKind::GreaterThan,
        TokenKind::GreaterThanOrEqual, TokenKind::LessThan, TokenKind::LessThanOrEqual,
        TokenKind::Eof,
    ];

    let tokens = scan(input, &Registry::standard())?;

    assert_eq!(tokens.len(), kinds.len(), "Wrong token count: {:?}", tokens);

    for (idx, (token, kind)) in tokens.iter().zip(kinds.iter()).enumerate() {
        assert_eq!(token.kind, *kind, "Unexpected kind at {}: {:?}", idx, token);

        if *kind != TokenKind::Eof {
            assert_eq!(token.text, kind.as_literal(), "Token text should be the operator itself at {}", idx);
        }
    }

    Ok(())
}

#[test]
fn test_two_character_operators() -> std::result::Result<(), LexicalError> {
    let input = "1!=2>=3<=4";

    let tokens = vec![
        Token::new(TokenKind::Number, "1", SrcSpan::from(0, 1)),
        Token::new(TokenKind::NotEqual, "!=", SrcSpan::from(1, 3)),
        Token::new(TokenKind::Number, "2", SrcSpan::from(3, 4)),
        Token::new(TokenKind::GreaterThanOrEqual, ">=", SrcSpan::from(4, 6)),
        Token::new(TokenKind::Number, "3", SrcSpan::from(6, 7)),
        Token::new(TokenKind::LessThanOrEqual, "<=", SrcSpan::from(7, 9)),
        Token::new(TokenKind::Number, "4", SrcSpan::from(9, 10)),
        Token::new(TokenKind::Eof, "", SrcSpan::from(10, 10)),
    ];

    check_tokens(input, &Registry::standard(), tokens)
}

#[test]
fn test_identifiers() -> std::result::Result<(), LexicalError> {
    let input = "{x} + {_total_2}*{Rate}";

    let tokens = vec![
        Token::new(TokenKind::Identifier, "x", SrcSpan::from(1, 2)),
        Token::new(TokenKind::Plus, "+", SrcSpan::from(4, 5)),
        Token::new(TokenKind::Identifier, "_total_2", SrcSpan::from(7, 15)),
        Token::new(TokenKind::Mul, "*", SrcSpan::from(16, 17)),
        Token::new(TokenKind::Identifier, "Rate", SrcSpan::from(18, 22)),
        Token::new(TokenKind::Eof, "", SrcSpan::from(23, 23)),
    ];

    check_tokens(input, &Registry::standard(), tokens)
}

#[test]
fn test_functions() -> std::result::Result<(), LexicalError> {
    let input = "max(1, Min(2), if(0,1,2))";

    let tokens = scan(input, &Registry::standard())?;

    let functions = tokens.iter()
        .filter(|token| token.is(TokenKind::Function))
        .map(|token| (token.text.as_str(), token.span))
        .collect::<Vec<(&str, SrcSpan)>>();

    assert_eq!(functions, vec![
        ("MAX", SrcSpan::from(0, 3)),
        ("MIN", SrcSpan::from(7, 10)),
        ("IF", SrcSpan::from(15, 17)),
    ]);

    Ok(())
}

#[test]
fn test_dotted_function_names() -> std::result::Result<(), LexicalError> {
    fn first(args: &[rust_decimal::Decimal]) -> Result<rust_decimal::Decimal, CallError> {
        Ok(args[0])
    }

    let registry = Registry::empty().with("MATH.FIRST", Arity::Exact(1), first);

    let tokens = vec![
        Token::new(TokenKind::Function, "MATH.FIRST", SrcSpan::from(0, 10)),
        Token::new(TokenKind::LParen, "(", SrcSpan::from(10, 11)),
        Token::new(TokenKind::Number, "1", SrcSpan::from(11, 12)),
        Token::new(TokenKind::RParen, ")", SrcSpan::from(12, 13)),
        Token::new(TokenKind::Eof, "", SrcSpan::from(13, 13)),
    ];

    check_tokens("math.First(1)", &registry, tokens)
}

#[test]
fn test_eof_after_whitespace() -> std::result::Result<(), LexicalError> {
    let tokens = scan("  1\t ", &Registry::standard())?;

    assert_eq!(tokens, vec![
        Token::new(TokenKind::Number, "1", SrcSpan::from(2, 3)),
        Token::new(TokenKind::Eof, "", SrcSpan::from(5, 5)),
    ]);

    let tokens = scan("", &Registry::standard())?;

    assert_eq!(tokens, vec![Token::new(TokenKind::Eof, "", SrcSpan::from(0, 0))]);

    Ok(())
}

#[test]
fn test_invalid_numbers() {
    check_error("1..2", LexicalError {
        error: LexicalErrorType::MultipleFloatingPoints,
        location: SrcSpan::from(2, 3),
    });

    check_error("1.2.3", LexicalError {
        error: LexicalErrorType::MultipleFloatingPoints,
        location: SrcSpan::from(3, 4),
    });

    check_error("1.", LexicalError {
        error: LexicalErrorType::MissingDigitAfterPeriod { found: None },
        location: SrcSpan::from(1, 2),
    });

    check_error("3.+1", LexicalError {
        error: LexicalErrorType::MissingDigitAfterPeriod { found: Some('+') },
        location: SrcSpan::from(1, 2),
    });

    let literal = "1234567890123456789012345678901234567890";

    check_error(literal, LexicalError {
        error: LexicalErrorType::NumberOutOfRange { literal: literal.to_string() },
        location: SrcSpan::from(0, 40),
    });
}

#[test]
fn test_invalid_identifiers() {
    check_error("{1abc}", LexicalError {
        error: LexicalErrorType::InvalidIdentifierStart { found: Some('1') },
        location: SrcSpan::from(1, 2),
    });

    check_error("{}", LexicalError {
        error: LexicalErrorType::InvalidIdentifierStart { found: Some('}') },
        location: SrcSpan::from(1, 2),
    });

    check_error("1 + {abc", LexicalError {
        error: LexicalErrorType::MissingIdentifierEnd { found: None },
        location: SrcSpan::from(8, 8),
    });

    check_error("{ab-c}", LexicalError {
        error: LexicalErrorType::MissingIdentifierEnd { found: Some('-') },
        location: SrcSpan::from(3, 4),
    });
}

#[test]
fn test_unknown_function() {
    check_error("2 * foo(1)", LexicalError {
        error: LexicalErrorType::UnknownFunction { name: "FOO".to_string() },
        location: SrcSpan::from(4, 7),
    });

    let registry = Registry::empty();
    let err = scan("MAX(1)", &registry).expect_err("empty registry knows no functions");

    assert_eq!(err.error, LexicalErrorType::UnknownFunction { name: "MAX".to_string() });
}

#[test]
fn test_illegal_characters() {
    check_error("1 + 2\n", LexicalError {
        error: LexicalErrorType::UnrecognizedToken { tok: '\n' },
        location: SrcSpan::from(5, 6),
    });

    check_error("1 # 2", LexicalError {
        error: LexicalErrorType::UnrecognizedToken { tok: '#' },
        location: SrcSpan::from(2, 3),
    });

    check_error("1 € 2", LexicalError {
        error: LexicalErrorType::UnrecognizedToken { tok: '€' },
        location: SrcSpan::from(2, 5),
    });
}

#[test]
fn test_error_kind_and_message() {
    let err = scan("1 $ 2", &Registry::standard()).expect_err("`$` is not a token");

    assert_eq!(err.kind(), crate::utils::prelude::ErrorKind::IllegalCharacter);
    assert_eq!(err.offending_char(), Some('$'));
    assert!(err.to_string().contains("at index 2"), "Message should name the position: {}", err);
}

#[test]
fn test_iterator_stops_after_error() {
    let registry = Registry::standard();
    let results = Lexer::for_source("1 # 2 3", &registry).collect::<Vec<LexResult>>();

    assert_eq!(results.len(), 2, "Lexer should stop at the first error: {:?}", results);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
}
