use crate::{
    environment::prelude::{Arity, Registry},
    lexer::prelude::{scan, TokenKind},
    parser::prelude::*,
    utils::prelude::{ErrorKind, SrcSpan}
};

fn parse_with(input: &str, registry: &Registry) -> Result<Node, ParseError> {
    let tokens = scan(input, registry).expect("test input should lex");

    Parser::new(tokens, registry).parse()
}

fn parse(input: &str) -> Result<Node, ParseError> {
    parse_with(input, &Registry::standard())
}

fn parse_err(input: &str) -> ParseError {
    match parse(input) {
        Ok(node) => panic!("Expected {:?} to fail, parsed {}", input, node),
        Err(err) => err,
    }
}

#[test]
fn test_precedence() -> Result<(), ParseError> {
    let cases = vec![
        ("1", "1"),
        ("{x}", "{x}"),
        ("1+2*3", "(1 + (2 * 3))"),
        ("(1+2)*3", "((1 + 2) * 3)"),
        ("1 + 2 > 3 - 1", "((1 + 2) > (3 - 1))"),
        ("1 | 0 & 1", "(1 | (0 & 1))"),
        ("!1 & 0 | 1", "(((!1) & 0) | 1)"),
        ("!1 = 0", "(!(1 = 0))"),
        ("!!0", "(!(!0))"),
        ("2*3^2", "(2 * (3 ^ 2))"),
        ("1 <= 2", "(1 <= 2)"),
        ("1 != 2", "(1 != 2)"),
    ];

    for (input, expected) in cases {
        let node = parse(input)?;

        assert_eq!(node.to_string(), expected, "Wrong tree for {:?}", input);
    }

    Ok(())
}

#[test]
fn test_right_associativity() -> Result<(), ParseError> {
    let cases = vec![
        ("2-3-4", "(2 - (3 - 4))"),
        ("8/4/2", "(8 / (4 / 2))"),
        ("2^3^2", "(2 ^ (3 ^ 2))"),
        ("1|0|1", "(1 | (0 | 1))"),
        ("1&1&0", "(1 & (1 & 0))"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.to_string(), expected, "Wrong grouping for {:?}", input);
    }

    Ok(())
}

#[test]
fn test_unary_signs() -> Result<(), ParseError> {
    let cases = vec![
        ("-1", "(-1)"),
        ("--1", "(-(-1))"),
        ("+-{x}", "(+(-{x}))"),
        ("-2^2", "(-(2 ^ 2))"),
        ("2^(-2^2)", "(2 ^ (-(2 ^ 2)))"),
        ("2^-2", "(2 ^ (-2))"),
        ("2*-3", "(2 * (-3))"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.to_string(), expected, "Wrong sign handling for {:?}", input);
    }

    Ok(())
}

#[test]
fn test_function_calls() -> Result<(), ParseError> {
    let node = parse("max(1, {x}, IF(1,2,3))")?;

    assert_eq!(node.to_string(), "MAX(1, {x}, IF(1, 2, 3))");
    assert_eq!(node.kind(), NodeKind::General);
    assert_eq!(node.span(), SrcSpan::from(0, 22));

    match &node {
        Node::General(general) => {
            assert_eq!(general.name, "MAX");
            assert_eq!(general.args.len(), 3);
            assert_eq!(general.args[2].kind(), NodeKind::General);
        },
        other => panic!("Expected a function call, got {:?}", other),
    }

    assert_eq!(parse("SUM()")?.to_string(), "SUM()");

    Ok(())
}

#[test]
fn test_postfix() -> Result<(), ParseError> {
    let cases = vec![
        ("1+2*3", "1 2 3 * +"),
        ("(1+2)*3", "1 2 + 3 *"),
        ("-2^2", "2 2 ^ neg"),
        ("!{a} | {b}", "{a} ! {b} |"),
        ("MAX(1, 2+3)", "1 2 3 + MAX/2"),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input)?.postfix(), expected, "Wrong postfix form for {:?}", input);
    }

    Ok(())
}

#[test]
fn test_node_accessors() -> Result<(), ParseError> {
    let node = parse("1 + 23")?;

    assert_eq!(node.kind(), NodeKind::Binary);
    assert_eq!(node.token().kind, TokenKind::Plus);
    assert_eq!(node.span(), SrcSpan::from(0, 6));

    let node = parse("-{x}")?;

    assert_eq!(node.kind(), NodeKind::Unary);
    assert_eq!(node.span(), SrcSpan::from(0, 3));

    let node = parse("{b} + {a} * MIN({b}, {c})")?;

    assert_eq!(node.identifiers(), vec!["b", "a", "c"]);
    assert!(parse("1 + 2")?.identifiers().is_empty());

    Ok(())
}

#[test]
fn test_deep_copy_is_independent() -> Result<(), ParseError> {
    let original = parse("IF({x} > 1, -{x}, 2^{y})")?;
    let mut copy = original.deep_copy();

    assert_eq!(original, copy);

    if let Node::General(general) = &mut copy {
        general.args.pop();
    }

    assert_ne!(original, copy);
    assert_eq!(original.to_string(), "IF(({x} > 1), (-{x}), (2 ^ {y}))");

    Ok(())
}

#[test]
fn test_tree_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Node>();
}

#[test]
fn test_wrong_argument_count() {
    let err = parse_err("IF(1,2)");

    assert_eq!(err.error, ParseErrorType::WrongArgumentCount {
        function: "IF".to_string(),
        expected: Arity::Exact(3),
        got: 2,
    });
    assert_eq!(err.span, SrcSpan::from(0, 7));
    assert_eq!(err.kind(), ErrorKind::IllegalSyntax);

    let err = parse_err("1 + MAX()");

    assert_eq!(err.error, ParseErrorType::WrongArgumentCount {
        function: "MAX".to_string(),
        expected: Arity::AtLeastOne,
        got: 0,
    });
    assert_eq!(err.details().1, vec!["`MAX` requires at least 1 argument, but got 0".to_string()]);
}

#[test]
fn test_incomplete_parse() {
    let err = parse_err("1 > 2 > 3");

    match &err.error {
        ParseErrorType::IncompleteParse { token } => assert_eq!(token.kind, TokenKind::GreaterThan),
        other => panic!("Expected an incomplete parse, got {:?}", other),
    }

    assert_eq!(err.span, SrcSpan::from(6, 7));
    assert_eq!(err.index, 3);

    let err = parse_err("1 2");

    assert!(matches!(err.error, ParseErrorType::IncompleteParse { .. }), "{:?}", err);
    assert_eq!(err.index, 1);
}

#[test]
fn test_unexpected_tokens() {
    let cases = vec![
        ("(1+2", true),
        ("1 +", true),
        ("", true),
        ("MAX 1", false),
        ("MAX(1 2)", false),
        ("* 2", false),
        (")", false),
        ("1 + ,", false),
    ];

    for (input, at_eof) in cases {
        let err = parse_err(input);

        assert_eq!(err.kind(), ErrorKind::IllegalSyntax, "Wrong kind for {:?}", input);

        match &err.error {
            ParseErrorType::UnexpectedEof { expected } if at_eof => {
                assert!(!expected.is_empty(), "Expected list should be filled for {:?}", input)
            },
            ParseErrorType::UnexpectedToken { expected, .. } if !at_eof => {
                assert!(!expected.is_empty(), "Expected list should be filled for {:?}", input)
            },
            other => panic!("Unexpected error for {:?}: {:?}", input, other),
        }
    }

    let err = parse_err("(1+2");

    assert_eq!(err.error, ParseErrorType::UnexpectedEof { expected: vec!["`)`".to_string()] });
    assert_eq!(err.span, SrcSpan::from(4, 4));
}

#[test]
fn test_depth_limit() -> Result<(), ParseError> {
    let registry = Registry::standard();

    let tokens = scan("1", &registry).expect("should lex");
    Parser::new(tokens, &registry).with_max_depth(8).parse()?;

    let tokens = scan("1+2", &registry).expect("should lex");
    let err = Parser::new(tokens, &registry).with_max_depth(8).parse().expect_err("too deep for 8 levels");

    assert_eq!(err.error, ParseErrorType::TooDeep { max_depth: 8 });
    assert_eq!(err.kind(), ErrorKind::TooDeep);

    let input = format!("{}1{}", "(".repeat(500), ")".repeat(500));
    let err = parse_err(&input);

    assert_eq!(err.error, ParseErrorType::TooDeep { max_depth: DEFAULT_MAX_DEPTH });

    Ok(())
}

#[test]
fn test_function_missing_from_parse_registry() {
    let tokens = scan("MAX(1)", &Registry::standard()).expect("should lex");
    let empty = Registry::empty();

    let err = Parser::new(tokens, &empty).parse().expect_err("parser registry has no MAX");

    assert_eq!(err.error, ParseErrorType::UnknownFunction { name: "MAX".to_string() });
    assert_eq!(err.kind(), ErrorKind::System);
}

#[test]
fn test_missing_eof_is_added() -> Result<(), ParseError> {
    let mut tokens = scan("1 + 2", &Registry::standard()).expect("should lex");
    tokens.pop();

    let registry = Registry::standard();
    let node = Parser::new(tokens, &registry).parse()?;

    assert_eq!(node.to_string(), "(1 + 2)");

    Ok(())
}
