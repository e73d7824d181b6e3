use std::fmt::Display;

use crate::{
    lexer::prelude::{Token, TokenKind},
    utils::prelude::SrcSpan
};

/// Reverse Polish rendering of a tree.
pub trait Postfix {
    fn postfix(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Unary,
    Binary,
    General,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "leaf"),
            NodeKind::Unary => write!(f, "unary"),
            NodeKind::Binary => write!(f, "binary"),
            NodeKind::General => write!(f, "general"),
        }
    }
}

/// Parse tree. Every node owns its children and keeps the token it was
/// built from, so a whole tree is `Send + Sync` and can be shared freely.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    Unary(Unary),
    Binary(Binary),
    General(General),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Unary(_) => NodeKind::Unary,
            Node::Binary(_) => NodeKind::Binary,
            Node::General(_) => NodeKind::General,
        }
    }

    /// The literal, operator or function-name token of this node.
    pub fn token(&self) -> &Token {
        match self {
            Node::Leaf(leaf) => &leaf.token,
            Node::Unary(unary) => &unary.token,
            Node::Binary(binary) => &binary.token,
            Node::General(general) => &general.token,
        }
    }

    /// Source range covered by the whole subtree.
    pub fn span(&self) -> SrcSpan {
        match self {
            Node::Leaf(leaf) => leaf.token.span,
            Node::Unary(unary) => unary.location,
            Node::Binary(binary) => binary.location,
            Node::General(general) => general.location,
        }
    }

    /// Fully independent copy of the tree.
    pub fn deep_copy(&self) -> Node {
        self.clone()
    }

    /// Names of the identifiers the tree reads, in first-use order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names = vec![];
        self.collect_identifiers(&mut names);

        names
    }

    fn collect_identifiers<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Node::Leaf(Leaf { kind: LeafKind::Identifier, token }) => {
                if !names.contains(&token.text.as_str()) {
                    names.push(&token.text);
                }
            },
            Node::Leaf(_) => {},
            Node::Unary(unary) => unary.operand.collect_identifiers(names),
            Node::Binary(binary) => {
                binary.left.collect_identifiers(names);
                binary.right.collect_identifiers(names);
            },
            Node::General(general) => {
                for arg in &general.args {
                    arg.collect_identifiers(names);
                }
            }
        }
    }

    pub fn leaf(kind: LeafKind, token: Token) -> Node {
        Node::Leaf(Leaf { kind, token })
    }

    pub fn unary(operator: UnaryOperator, token: Token, operand: Node) -> Node {
        let location = token.span.merge(operand.span());

        Node::Unary(Unary {
            operator,
            token,
            operand: Box::new(operand),
            location,
        })
    }

    pub fn binary(operator: BinaryOperator, token: Token, left: Node, right: Node) -> Node {
        let location = left.span().merge(right.span());

        Node::Binary(Binary {
            operator,
            token,
            left: Box::new(left),
            right: Box::new(right),
            location,
        })
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Leaf(leaf) => write!(f, "{leaf}"),
            Node::Unary(unary) => write!(f, "{unary}"),
            Node::Binary(binary) => write!(f, "{binary}"),
            Node::General(general) => write!(f, "{general}"),
        }
    }
}

impl Postfix for Node {
    fn postfix(&self) -> String {
        match self {
            Node::Leaf(leaf) => leaf.to_string(),
            Node::Unary(unary) => unary.postfix(),
            Node::Binary(binary) => binary.postfix(),
            Node::General(general) => general.postfix(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    Number,
    Identifier,
}

// leaf -> <число> | {<идентификатор>}
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub kind: LeafKind,
    pub token: Token,
}

impl Display for Leaf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            LeafKind::Number => write!(f, "{}", self.token.text),
            LeafKind::Identifier => write!(f, "{{{}}}", self.token.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

impl UnaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(UnaryOperator::Plus),
            TokenKind::Minus => Some(UnaryOperator::Minus),
            TokenKind::Not => Some(UnaryOperator::Not),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

// unary -> (+ | - | !) <операнд>
#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub token: Token,
    pub operand: Box<Node>,
    pub location: SrcSpan,
}

impl Display for Unary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator, self.operand)
    }
}

impl Postfix for Unary {
    fn postfix(&self) -> String {
        let operator = match self.operator {
            UnaryOperator::Plus => "pos",
            UnaryOperator::Minus => "neg",
            UnaryOperator::Not => "!",
        };

        format!("{} {operator}", self.operand.postfix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Or => BinaryOperator::Or,
            TokenKind::And => BinaryOperator::And,
            TokenKind::Equal => BinaryOperator::Equal,
            TokenKind::NotEqual => BinaryOperator::NotEqual,
            TokenKind::GreaterThan => BinaryOperator::GreaterThan,
            TokenKind::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
            TokenKind::LessThan => BinaryOperator::LessThan,
            TokenKind::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::Mul => BinaryOperator::Mul,
            TokenKind::Div => BinaryOperator::Div,
            TokenKind::Pow => BinaryOperator::Pow,
            _ => return None
        })
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            BinaryOperator::Or => "|",
            BinaryOperator::And => "&",
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Pow => "^",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self,
            BinaryOperator::Equal
            | BinaryOperator::NotEqual
            | BinaryOperator::GreaterThan
            | BinaryOperator::GreaterThanOrEqual
            | BinaryOperator::LessThan
            | BinaryOperator::LessThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::Or | BinaryOperator::And)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

// binary -> <левый> <операция> <правый>
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub operator: BinaryOperator,
    pub token: Token,
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub location: SrcSpan,
}

impl Display for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

impl Postfix for Binary {
    fn postfix(&self) -> String {
        format!("{} {} {}", self.left.postfix(), self.right.postfix(), self.operator)
    }
}

// general -> <функция>([<выражение> {, <выражение>}])
#[derive(Debug, Clone, PartialEq)]
pub struct General {
    pub name: String,
    pub token: Token,
    pub args: Vec<Node>,
    pub location: SrcSpan,
}

impl Display for General {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args = self.args.iter()
            .map(|arg| format!("{}", arg))
            .collect::<Vec<String>>();

        write!(f, "{}({})", self.name, args.join(", "))
    }
}

impl Postfix for General {
    /// Arguments first, then `NAME/argc`.
    fn postfix(&self) -> String {
        let args = self.args.iter()
            .map(|arg| arg.postfix())
            .chain(std::iter::once(format!("{}/{}", self.name, self.args.len())))
            .collect::<Vec<String>>();

        args.join(" ")
    }
}
