use rust_decimal::{Decimal, MathematicalOps};

use crate::{
    environment::prelude::{from_bool, parse_value, truthy, Bindings, Registry},
    lexer::prelude::Token,
    parser::prelude::{Binary, BinaryOperator, General, Leaf, LeafKind, Node, Unary, UnaryOperator},
};
use super::error::{EvalError, EvalErrorType};

pub type EvalResult = Result<Decimal, EvalError>;

/// Tree-walking evaluator. Reads the tree and the bindings, never writes
/// to either, so one tree can be evaluated from many threads at once.
pub struct Interpreter<'a> {
    registry: &'a Registry,
    bindings: &'a Bindings,
}

impl<'a> Interpreter<'a> {
    pub fn new(registry: &'a Registry, bindings: &'a Bindings) -> Self {
        Self { registry, bindings }
    }

    pub fn evaluate(&self, node: &Node) -> EvalResult {
        match node {
            Node::Leaf(leaf) => self.leaf(leaf),
            Node::Unary(unary) => self.unary(unary),
            Node::Binary(binary) => self.binary(binary),
            Node::General(general) => self.general(general),
        }
    }

    fn leaf(&self, leaf: &Leaf) -> EvalResult {
        let text = match leaf.kind {
            LeafKind::Number => leaf.token.text.as_str(),
            LeafKind::Identifier => self.bindings.get(&leaf.token.text).ok_or_else(|| EvalError::new(
                EvalErrorType::MissingIdentifier { name: leaf.token.text.clone() },
                leaf.token.span
            ))?,
        };

        parse_value(text).map_err(|_| EvalError::new(
            EvalErrorType::MalformedDecimal { text: text.to_string() },
            leaf.token.span
        ))
    }

    fn unary(&self, unary: &Unary) -> EvalResult {
        let operand = self.operand(&unary.operand, &unary.token)?;

        Ok(apply_unary(unary.operator, operand))
    }

    fn binary(&self, binary: &Binary) -> EvalResult {
        let left = self.operand(&binary.left, &binary.token)?;
        let right = self.operand(&binary.right, &binary.token)?;

        apply_binary(binary.operator, left, right)
            .map_err(|error| EvalError::new(error, binary.token.span))
    }

    fn general(&self, general: &General) -> EvalResult {
        let args = general.args.iter()
            .map(|arg| self.operand(arg, &general.token))
            .collect::<Result<Vec<Decimal>, EvalError>>()?;

        self.registry.call(&general.name, &args).map_err(|error| EvalError::new(
            EvalErrorType::Call { function: general.name.clone(), error },
            general.token.span
        ))
    }

    fn operand(&self, node: &Node, applied_by: &Token) -> EvalResult {
        self.evaluate(node).map_err(|err| err.through(applied_by))
    }
}

pub fn apply_unary(operator: UnaryOperator, operand: Decimal) -> Decimal {
    match operator {
        UnaryOperator::Plus => operand,
        UnaryOperator::Minus => -operand,
        UnaryOperator::Not => from_bool(!truthy(&operand)),
    }
}

pub fn apply_binary(operator: BinaryOperator, left: Decimal, right: Decimal) -> Result<Decimal, EvalErrorType> {
    let overflow = || EvalErrorType::Overflow { operator };

    match operator {
        BinaryOperator::Or => Ok(from_bool(truthy(&left) || truthy(&right))),
        BinaryOperator::And => Ok(from_bool(truthy(&left) && truthy(&right))),
        BinaryOperator::Equal => Ok(from_bool(left == right)),
        BinaryOperator::NotEqual => Ok(from_bool(left != right)),
        BinaryOperator::GreaterThan => Ok(from_bool(left > right)),
        BinaryOperator::GreaterThanOrEqual => Ok(from_bool(left >= right)),
        BinaryOperator::LessThan => Ok(from_bool(left < right)),
        BinaryOperator::LessThanOrEqual => Ok(from_bool(left <= right)),
        BinaryOperator::Add => left.checked_add(right).ok_or_else(overflow),
        BinaryOperator::Sub => left.checked_sub(right).ok_or_else(overflow),
        BinaryOperator::Mul => left.checked_mul(right).ok_or_else(overflow),
        BinaryOperator::Div => {
            if right.is_zero() {
                return Err(EvalErrorType::DivisionByZero);
            }

            left.checked_div(right).ok_or_else(overflow)
        },
        BinaryOperator::Pow => power(left, right),
    }
}

fn power(base: Decimal, exponent: Decimal) -> Result<Decimal, EvalErrorType> {
    if base.is_zero() && exponent.is_sign_negative() && !exponent.is_zero() {
        return Err(EvalErrorType::ZeroToNegativePower);
    }

    if base.is_sign_negative() && !base.is_zero() && !exponent.fract().is_zero() {
        return Err(EvalErrorType::InvalidPower);
    }

    let shrinks = if exponent.is_sign_negative() {
        base.abs() > Decimal::ONE
    } else {
        base.abs() < Decimal::ONE
    };

    match base.checked_powd(exponent) {
        Some(value) => Ok(value),
        // Below the smallest representable step: rounds to zero like `0.1 ^ 30`.
        None if shrinks => Ok(Decimal::ZERO),
        None => Err(EvalErrorType::Overflow { operator: BinaryOperator::Pow }),
    }
}

/// Evaluates `node` with a throwaway interpreter.
pub fn eval(node: &Node, registry: &Registry, bindings: &Bindings) -> EvalResult {
    Interpreter::new(registry, bindings).evaluate(node)
}
