use crate::{
    environment::prelude::Registry,
    lexer::prelude::{Token, TokenKind},
    utils::prelude::SrcSpan
};
use super::error::{parse_error, ParseError, ParseErrorType};
use super::ast::{BinaryOperator, General, LeafKind, Node, UnaryOperator};

pub type ParseResult = Result<Node, ParseError>;

/// Grammar levels a parse may descend before giving up.
///
/// Every production is one level and a parenthesis costs eight, so the
/// default allows 31 nested parentheses or a chain of 248 operands. That
/// stays well inside a 2 MiB thread stack even in unoptimised builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

const OR_OPERATORS: &[TokenKind] = &[TokenKind::Or];
const AND_OPERATORS: &[TokenKind] = &[TokenKind::And];
const ADDITIVE_OPERATORS: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus];
const MULTIPLICATIVE_OPERATORS: &[TokenKind] = &[TokenKind::Mul, TokenKind::Div];

const OPERAND_START: &[&str] = &["number", "identifier", "function", "`(`", "`+`", "`-`"];

/// Recursive-descent parser over an already scanned token list.
///
/// Grammar, loosest first:
///
/// ```text
/// expr     := and_term [ `|` expr ]
/// and_term := not_term [ `&` and_term ]
/// not_term := `!` not_term | com_term
/// com_term := pri_ope [ (`=`|`!=`|`>`|`>=`|`<`|`<=`) pri_ope ]
/// pri_ope  := sec_ope [ (`+`|`-`) pri_ope ]
/// sec_ope  := ter_ope [ (`*`|`/`) sec_ope ]
/// ter_ope  := (`+`|`-`) ter_ope | factor [ `^` ter_ope ]
/// factor   := NUMBER | IDENTIFIER | FUNCTION `(` [ expr { `,` expr } ] `)` | `(` expr `)`
/// ```
///
/// Every binary level recurses on its right operand, so all of them group
/// to the right: `2-3-4` is `2-(3-4)`.
pub struct Parser<'r> {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
    max_depth: usize,
    registry: &'r Registry,
}

impl<'r> Parser<'r> {
    pub fn new(mut tokens: Vec<Token>, registry: &'r Registry) -> Self {
        if !tokens.last().is_some_and(|token| token.is(TokenKind::Eof)) {
            let at = tokens.last().map_or(0, |token| token.span.end);
            tokens.push(Token::new(TokenKind::Eof, "", SrcSpan::empty(at)));
        }

        Self {
            tokens,
            index: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            registry,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Parses one expression and requires it to span all tokens.
    pub fn parse(&mut self) -> ParseResult {
        let node = self.expr()?;
        let token = self.current();

        if !token.is(TokenKind::Eof) {
            return parse_error(
                ParseErrorType::IncompleteParse { token: token.clone() },
                token.span,
                self.index
            );
        }

        log::trace!("parsed {} tokens into {node}", self.tokens.len());

        Ok(node)
    }

    pub fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof, and `advance` never steps past it.
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();

        if !token.is(TokenKind::Eof) {
            self.index += 1;
        }

        token
    }

    pub fn expect_one(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.current().is(kind) {
            return Ok(self.advance());
        }

        self.unexpected(vec![kind.to_string()])
    }

    fn unexpected<T>(&self, expected: Vec<String>) -> Result<T, ParseError> {
        let token = self.current();

        let error = match token.kind {
            TokenKind::Eof => ParseErrorType::UnexpectedEof { expected },
            _ => ParseErrorType::UnexpectedToken { token: token.clone(), expected },
        };

        parse_error(error, token.span, self.index)
    }

    /// Errors abort the whole parse, so only the success paths call `leave`.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            return parse_error(
                ParseErrorType::TooDeep { max_depth: self.max_depth },
                self.current().span,
                self.index
            );
        }

        self.depth += 1;

        Ok(())
    }

    fn leave(&mut self, node: Node) -> ParseResult {
        self.depth -= 1;

        Ok(node)
    }

    fn right_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult,
        rest: fn(&mut Self) -> ParseResult,
    ) -> ParseResult {
        let left = operand(self)?;

        if !operators.contains(&self.current().kind) {
            return Ok(left);
        }

        let token = self.advance();
        let right = rest(self)?;

        self.binary(token, left, right)
    }

    fn binary(&self, token: Token, left: Node, right: Node) -> ParseResult {
        match BinaryOperator::from_token(token.kind) {
            Some(operator) => Ok(Node::binary(operator, token, left, right)),
            None => parse_error(
                ParseErrorType::UnexpectedToken { token: token.clone(), expected: vec!["binary operator".into()] },
                token.span,
                self.index
            )
        }
    }

    fn unary(&self, token: Token, operand: Node) -> ParseResult {
        match UnaryOperator::from_token(token.kind) {
            Some(operator) => Ok(Node::unary(operator, token, operand)),
            None => parse_error(
                ParseErrorType::UnexpectedToken { token: token.clone(), expected: vec!["unary operator".into()] },
                token.span,
                self.index
            )
        }
    }

    fn expr(&mut self) -> ParseResult {
        self.enter()?;
        let node = self.right_assoc(OR_OPERATORS, Self::and_term, Self::expr)?;
        self.leave(node)
    }

    fn and_term(&mut self) -> ParseResult {
        self.enter()?;
        let node = self.right_assoc(AND_OPERATORS, Self::not_term, Self::and_term)?;
        self.leave(node)
    }

    fn not_term(&mut self) -> ParseResult {
        self.enter()?;

        let node = if self.current().is(TokenKind::Not) {
            let token = self.advance();
            let operand = self.not_term()?;

            self.unary(token, operand)?
        } else {
            self.com_term()?
        };

        self.leave(node)
    }

    /// At most one comparison per level; `a > b > c` leaves `> c` unparsed.
    fn com_term(&mut self) -> ParseResult {
        self.enter()?;

        let left = self.pri_ope()?;

        let node = if self.current().kind.is_comparison() {
            let token = self.advance();
            let right = self.pri_ope()?;

            self.binary(token, left, right)?
        } else {
            left
        };

        self.leave(node)
    }

    fn pri_ope(&mut self) -> ParseResult {
        self.enter()?;
        let node = self.right_assoc(ADDITIVE_OPERATORS, Self::sec_ope, Self::pri_ope)?;
        self.leave(node)
    }

    fn sec_ope(&mut self) -> ParseResult {
        self.enter()?;
        let node = self.right_assoc(MULTIPLICATIVE_OPERATORS, Self::ter_ope, Self::sec_ope)?;
        self.leave(node)
    }

    /// A leading sign covers the whole power that follows: `-2^2` is `-(2^2)`.
    fn ter_ope(&mut self) -> ParseResult {
        self.enter()?;

        let node = match self.current().kind {
            TokenKind::Plus | TokenKind::Minus => {
                let token = self.advance();
                let operand = self.ter_ope()?;

                self.unary(token, operand)?
            },
            _ => {
                let base = self.factor()?;

                if self.current().is(TokenKind::Pow) {
                    let token = self.advance();
                    let exponent = self.ter_ope()?;

                    self.binary(token, base, exponent)?
                } else {
                    base
                }
            }
        };

        self.leave(node)
    }

    fn factor(&mut self) -> ParseResult {
        self.enter()?;

        let node = match self.current().kind {
            TokenKind::Number => Node::leaf(LeafKind::Number, self.advance()),
            TokenKind::Identifier => Node::leaf(LeafKind::Identifier, self.advance()),
            TokenKind::Function => self.function_call()?,
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect_one(TokenKind::RParen)?;

                inner
            },
            _ => return self.unexpected(OPERAND_START.iter().map(|s| s.to_string()).collect()),
        };

        self.leave(node)
    }

    fn function_call(&mut self) -> ParseResult {
        let token = self.advance();
        let name = token.text.clone();

        self.expect_one(TokenKind::LParen)?;

        let mut args = vec![];

        if !self.current().is(TokenKind::RParen) {
            args.push(self.expr()?);

            while self.current().is(TokenKind::Comma) {
                self.advance();
                args.push(self.expr()?);
            }
        }

        if !self.current().is(TokenKind::RParen) {
            return self.unexpected(vec![TokenKind::Comma.to_string(), TokenKind::RParen.to_string()]);
        }

        let location = token.span.merge(self.current().span);

        let expected = match self.registry.arity(&name) {
            Some(arity) => arity,
            None => return parse_error(
                ParseErrorType::UnknownFunction { name },
                token.span,
                self.index
            )
        };

        if !expected.check(args.len()) {
            return parse_error(
                ParseErrorType::WrongArgumentCount { function: name, expected, got: args.len() },
                location,
                self.index
            );
        }

        self.advance();

        Ok(Node::General(General {
            name,
            token,
            args,
            location,
        }))
    }
}

/// Parses a scanned token list with the default depth limit.
pub fn parse_tokens(tokens: Vec<Token>, registry: &Registry) -> ParseResult {
    Parser::new(tokens, registry).parse()
}
