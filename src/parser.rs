//! lexer and parser for tixy expressions
//!
//! The grammar is the arithmetic/boolean subset of JavaScript expressions:
//! literals, names, calls, unary and binary operators with JavaScript
//! precedence, and the `?:` conditional. Names are not resolved here, see
//! `compiler`.
use chumsky::{input::ValueInput, pratt::*, prelude::*};
use std::fmt;

use crate::error::CompileError;

pub type Span = SimpleSpan;
pub type ParseError<'src, T> = Rich<'src, T, Span>;

/// how far the parser may recurse: open brackets, prefix runs, `**` and `?`
pub const MAX_NESTING: usize = 64;
/// tallest tree an expression may turn into. lowering and evaluation recurse
/// once per level
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'src> {
    Number(f64),
    Identifier(&'src str),
    True,
    False,
    ParenOpen,
    ParenClose,
    Comma,
    Dot,
    Question,
    Colon,
    Plus,
    Minus,
    Asterisk,
    StarStar,
    Slash,
    Percent,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    Ampersand,
    Pipe,
    Caret,
    Tilde,
    Bang,
    And,
    Or,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Self::Number(number) => return write!(f, "{number}"),
            Self::Identifier(identifier) => identifier,
            Self::True => "true",
            Self::False => "false",
            Self::ParenOpen => "(",
            Self::ParenClose => ")",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Asterisk => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::ShiftRightUnsigned => ">>>",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Tilde => "~",
            Self::Bang => "!",
            Self::And => "&&",
            Self::Or => "||",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Plus,
    Not,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    ShiftLeft,
    ShiftRight,
    ShiftRightUnsigned,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
}

/// syntax tree of one expression; names are kept as written
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Bool(bool),
    Name(String),
    Call {
        name: String,
        arguments: Vec<Expr>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternative: Box<Expr>,
    },
}

impl Expr {
    fn unary(operator: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            operator,
            operand: Box::new(operand),
        }
    }

    fn binary(operator: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Number(_) | Expr::Bool(_) | Expr::Name(_) => Vec::new(),
            Expr::Call { arguments, .. } => arguments.iter().collect(),
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Conditional {
                condition,
                consequent,
                alternative,
            } => vec![condition.as_ref(), consequent.as_ref(), alternative.as_ref()],
        }
    }

    /// height of the tree, a lone literal is 1. walks without recursing
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((expr, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(expr.children().into_iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    // dropping a tall tree the default way recurses once per level
    fn dismantle(self) {
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                Expr::Call { arguments, .. } => pending.extend(arguments),
                Expr::Unary { operand, .. } => pending.push(*operand),
                Expr::Binary { left, right, .. } => {
                    pending.push(*left);
                    pending.push(*right);
                }
                Expr::Conditional {
                    condition,
                    consequent,
                    alternative,
                } => {
                    pending.push(*condition);
                    pending.push(*consequent);
                    pending.push(*alternative);
                }
                Expr::Number(_) | Expr::Bool(_) | Expr::Name(_) => {}
            }
        }
    }
}

/// upper bound on how deep the parser recurses for these tokens. `**` and
/// `?` are never closed off, so every one of them counts
fn nesting(tokens: &[(Token<'_>, Span)]) -> usize {
    let mut brackets = 0usize;
    let mut chained = 0usize;
    let mut prefix = 0usize;
    let mut deepest = 0;
    for (token, _) in tokens {
        match token {
            Token::ParenOpen => brackets += 1,
            Token::ParenClose => brackets = brackets.saturating_sub(1),
            Token::StarStar | Token::Question => chained += 1,
            _ => {}
        }
        prefix = match token {
            Token::Minus | Token::Plus | Token::Bang | Token::Tilde => prefix + 1,
            _ => 0,
        };
        deepest = deepest.max(brackets + chained + prefix);
    }
    deepest
}

pub fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<(Token<'src>, Span)>, extra::Err<ParseError<'src, char>>> {
    let digits = text::digits(10);
    let exponent = one_of("eE")
        .then(one_of("+-").or_not())
        .then(digits.clone());

    // `0xff`, `0b101`, `0o17`
    let prefixed = |markers: &'static str, radix: u32| {
        just('0')
            .then(one_of(markers))
            .ignore_then(text::digits(radix).to_slice())
            .try_map(move |literal: &str, span| {
                u64::from_str_radix(literal, radix)
                    .map(|number| Token::Number(number as f64))
                    .map_err(|error| ParseError::custom(span, error))
            })
    };

    // `1`, `1.`, `1.5`, `.5`, each with an optional exponent
    let decimal = choice((
        digits
            .clone()
            .then(just('.').then(digits.clone().or_not()).or_not())
            .ignored(),
        just('.').then(digits.clone()).ignored(),
    ))
    .then(exponent.or_not())
    .to_slice()
    .try_map(|literal: &str, span| {
        legacy_octal(literal)
            .map_or_else(|| literal.parse::<f64>(), Ok)
            .map(Token::Number)
            .map_err(|error| ParseError::custom(span, error))
    });

    let number = choice((
        prefixed("xX", 16),
        prefixed("bB", 2),
        prefixed("oO", 8),
        decimal,
    ));

    let word = text::ascii::ident().map(|word: &str| match word {
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Identifier(word),
    });

    // longest first
    let compound_operator = choice((
        just(">>>").to(Token::ShiftRightUnsigned),
        just("===").to(Token::StrictEqual),
        just("!==").to(Token::StrictNotEqual),
        just("**").to(Token::StarStar),
        just("<<").to(Token::ShiftLeft),
        just(">>").to(Token::ShiftRight),
        just("<=").to(Token::LessOrEqual),
        just(">=").to(Token::GreaterOrEqual),
        just("==").to(Token::Equal),
        just("!=").to(Token::NotEqual),
        just("&&").to(Token::And),
        just("||").to(Token::Or),
    ));

    let operator = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Asterisk),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('<').to(Token::Less),
        just('>').to(Token::Greater),
        just('&').to(Token::Ampersand),
        just('|').to(Token::Pipe),
        just('^').to(Token::Caret),
        just('~').to(Token::Tilde),
        just('!').to(Token::Bang),
    ));

    let punctuation = choice((
        just('(').to(Token::ParenOpen),
        just(')').to(Token::ParenClose),
        just(',').to(Token::Comma),
        just('.').to(Token::Dot),
        just('?').to(Token::Question),
        just(':').to(Token::Colon),
    ));

    let token = choice((number, word, compound_operator, operator, punctuation));

    text::whitespace().ignore_then(
        token
            .map_with(|token, extra| (token, extra.span()))
            .padded()
            .repeated()
            .collect::<Vec<_>>(),
    )
}

/// `010` is eight, while `019` and `0.5` stay decimal
fn legacy_octal(literal: &str) -> Option<f64> {
    let rest = literal.strip_prefix('0')?;
    if rest.is_empty() || !rest.bytes().all(|digit| (b'0'..=b'7').contains(&digit)) {
        return None;
    }
    u64::from_str_radix(rest, 8).ok().map(|number| number as f64)
}

pub fn parser<'src, I>(
) -> impl Parser<'src, I, Expr, extra::Err<ParseError<'src, Token<'src>>>> + Clone
where
    I: ValueInput<'src, Token = Token<'src>, Span = Span>,
{
    recursive(|expression| {
        let literal = select! {
            Token::Number(number) => Expr::Number(number),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
        };

        let identifier = select! { Token::Identifier(name) => name.to_owned() };

        // `Math.` is accepted and ignored: every math name is already in scope
        let name = just(Token::Identifier("Math"))
            .then(just(Token::Dot))
            .or_not()
            .ignore_then(identifier);

        let arguments = expression
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        let reference = name
            .then(arguments.or_not())
            .map(|(name, arguments)| match arguments {
                Some(arguments) => Expr::Call { name, arguments },
                None => Expr::Name(name),
            });

        let parenthesized = expression
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        let atom = choice((literal, reference, parenthesized));

        let operation = atom.pratt((
            // `**` binds tighter than prefix operators, so `-2 ** 2` is `-(2 ** 2)`
            infix(right(12), just(Token::StarStar), |l, _, r, _| {
                Expr::binary(BinaryOperator::Power, l, r)
            }),
            prefix(
                11,
                select! {
                    Token::Minus => UnaryOperator::Negate,
                    Token::Plus => UnaryOperator::Plus,
                    Token::Bang => UnaryOperator::Not,
                    Token::Tilde => UnaryOperator::BitNot,
                },
                |operator, operand, _| Expr::unary(operator, operand),
            ),
            infix(
                left(10),
                select! {
                    Token::Asterisk => BinaryOperator::Multiply,
                    Token::Slash => BinaryOperator::Divide,
                    Token::Percent => BinaryOperator::Remainder,
                },
                |l, operator, r, _| Expr::binary(operator, l, r),
            ),
            infix(
                left(9),
                select! {
                    Token::Plus => BinaryOperator::Add,
                    Token::Minus => BinaryOperator::Subtract,
                },
                |l, operator, r, _| Expr::binary(operator, l, r),
            ),
            infix(
                left(8),
                select! {
                    Token::ShiftLeft => BinaryOperator::ShiftLeft,
                    Token::ShiftRight => BinaryOperator::ShiftRight,
                    Token::ShiftRightUnsigned => BinaryOperator::ShiftRightUnsigned,
                },
                |l, operator, r, _| Expr::binary(operator, l, r),
            ),
            infix(
                left(7),
                select! {
                    Token::Less => BinaryOperator::Less,
                    Token::LessOrEqual => BinaryOperator::LessOrEqual,
                    Token::Greater => BinaryOperator::Greater,
                    Token::GreaterOrEqual => BinaryOperator::GreaterOrEqual,
                },
                |l, operator, r, _| Expr::binary(operator, l, r),
            ),
            infix(
                left(6),
                select! {
                    Token::Equal => BinaryOperator::Equal,
                    Token::NotEqual => BinaryOperator::NotEqual,
                    Token::StrictEqual => BinaryOperator::StrictEqual,
                    Token::StrictNotEqual => BinaryOperator::StrictNotEqual,
                },
                |l, operator, r, _| Expr::binary(operator, l, r),
            ),
            infix(left(5), just(Token::Ampersand), |l, _, r, _| {
                Expr::binary(BinaryOperator::BitAnd, l, r)
            }),
            infix(left(4), just(Token::Caret), |l, _, r, _| {
                Expr::binary(BinaryOperator::BitXor, l, r)
            }),
            infix(left(3), just(Token::Pipe), |l, _, r, _| {
                Expr::binary(BinaryOperator::BitOr, l, r)
            }),
            infix(left(2), just(Token::And), |l, _, r, _| {
                Expr::binary(BinaryOperator::And, l, r)
            }),
            infix(left(1), just(Token::Or), |l, _, r, _| {
                Expr::binary(BinaryOperator::Or, l, r)
            }),
        ));

        operation
            .then(
                just(Token::Question)
                    .ignore_then(expression.clone())
                    .then_ignore(just(Token::Colon))
                    .then(expression)
                    .or_not(),
            )
            .map(|(condition, branches)| match branches {
                Some((consequent, alternative)) => Expr::Conditional {
                    condition: Box::new(condition),
                    consequent: Box::new(consequent),
                    alternative: Box::new(alternative),
                },
                None => condition,
            })
    })
}

/// parse source text; `Ok(None)` means there was nothing but whitespace
pub fn parse(source: &str) -> Result<Option<Expr>, CompileError> {
    let (tokens, lex_errors) = lexer().parse(source).into_output_errors();
    if !lex_errors.is_empty() {
        return Err(CompileError::new(
            lex_errors.iter().map(|error| error.to_string()),
        ));
    }

    let tokens = tokens.unwrap_or_default();
    if tokens.is_empty() {
        return Ok(None);
    }
    if nesting(&tokens) > MAX_NESTING {
        return Err(CompileError::new([format!(
            "expression nests deeper than {MAX_NESTING} levels"
        )]));
    }

    let end = source.len();
    let input = tokens
        .as_slice()
        .map((end..end).into(), |(token, span)| (token, span));

    let (expression, parse_errors) = parser().parse(input).into_output_errors();
    if !parse_errors.is_empty() {
        return Err(CompileError::new(
            parse_errors.iter().map(|error| error.to_string()),
        ));
    }

    let expression =
        expression.ok_or_else(|| CompileError::new([String::from("no expression")]))?;
    if expression.depth() > MAX_DEPTH {
        expression.dismantle();
        return Err(CompileError::new([format!(
            "expression is deeper than {MAX_DEPTH} levels"
        )]));
    }
    Ok(Some(expression))
}
