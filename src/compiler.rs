//! turns source text into an evaluator of `(t, i, x, y)`
//!
//! Compiling parses the text and resolves every name against the parameters
//! and the `math` allow-list once, so evaluating a cell is a plain tree walk.
//! A name that resolves to nothing is kept as a node that fails when it is
//! evaluated, so an unknown name only fails the cells that reach it.
use tracing::debug;

use crate::error::{CompileError, EvalError};
use crate::math::{self, Function, Symbol};
use crate::parser::{self, BinaryOperator, Expr, UnaryOperator};

/// what an expression evaluates to before it is coerced to a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Undefined,
}

impl Value {
    /// numeric coercion: `true` is 1, `false` is 0, undefined is NaN
    pub fn to_number(self) -> f64 {
        match self {
            Value::Number(number) => number,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Undefined => f64::NAN,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Value::Number(number) => number != 0.0 && !number.is_nan(),
            Value::Bool(boolean) => boolean,
            Value::Undefined => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parameter {
    Time,
    Index,
    X,
    Y,
}

impl Parameter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "t" => Some(Parameter::Time),
            "i" => Some(Parameter::Index),
            "x" => Some(Parameter::X),
            "y" => Some(Parameter::Y),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    t: f64,
    i: f64,
    x: f64,
    y: f64,
}

impl Scope {
    fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Time => self.t,
            Parameter::Index => self.i,
            Parameter::X => self.x,
            Parameter::Y => self.y,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Literal(Value),
    Parameter(Parameter),
    Unresolved(String),
    Call {
        function: Function,
        arguments: Vec<Node>,
    },
    NotCallable {
        name: String,
        arguments: Vec<Node>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Conditional {
        condition: Box<Node>,
        consequent: Box<Node>,
        alternative: Box<Node>,
    },
}

impl Node {
    fn lower(expr: Expr) -> Node {
        match expr {
            Expr::Number(number) => Node::Literal(Value::Number(number)),
            Expr::Bool(boolean) => Node::Literal(Value::Bool(boolean)),
            Expr::Name(name) => {
                if let Some(parameter) = Parameter::from_name(&name) {
                    return Node::Parameter(parameter);
                }
                match math::lookup(&name) {
                    Some(Symbol::Constant(number)) => Node::Literal(Value::Number(number)),
                    Some(Symbol::Undefined) => Node::Literal(Value::Undefined),
                    // a bare function only ever gets coerced to a number
                    Some(Symbol::Callable(_)) => Node::Literal(Value::Number(f64::NAN)),
                    None => Node::Unresolved(name),
                }
            }
            Expr::Call { name, arguments } => {
                let arguments = arguments.into_iter().map(Node::lower).collect();
                if Parameter::from_name(&name).is_some() {
                    return Node::NotCallable { name, arguments };
                }
                match math::lookup(&name) {
                    Some(Symbol::Callable(function)) => Node::Call {
                        function,
                        arguments,
                    },
                    Some(_) => Node::NotCallable { name, arguments },
                    None => Node::Unresolved(name),
                }
            }
            Expr::Unary { operator, operand } => Node::Unary {
                operator,
                operand: Box::new(Node::lower(*operand)),
            },
            Expr::Binary {
                operator,
                left,
                right,
            } => Node::Binary {
                operator,
                left: Box::new(Node::lower(*left)),
                right: Box::new(Node::lower(*right)),
            },
            Expr::Conditional {
                condition,
                consequent,
                alternative,
            } => Node::Conditional {
                condition: Box::new(Node::lower(*condition)),
                consequent: Box::new(Node::lower(*consequent)),
                alternative: Box::new(Node::lower(*alternative)),
            },
        }
    }

    fn evaluate(&self, scope: &Scope) -> Result<Value, EvalError> {
        match self {
            Node::Literal(value) => Ok(*value),
            Node::Parameter(parameter) => Ok(Value::Number(scope.get(*parameter))),
            Node::Unresolved(name) => Err(EvalError::UnknownName(name.clone())),
            Node::Call {
                function,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| argument.evaluate(scope).map(Value::to_number))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Number(function.apply(&arguments)))
            }
            Node::NotCallable { name, arguments } => {
                for argument in arguments {
                    argument.evaluate(scope)?;
                }
                Err(EvalError::NotCallable(name.clone()))
            }
            Node::Unary { operator, operand } => {
                let operand = operand.evaluate(scope)?;
                Ok(apply_unary(*operator, operand))
            }
            Node::Binary {
                operator,
                left,
                right,
            } => {
                let left = left.evaluate(scope)?;
                // short circuit before touching the right hand side
                match operator {
                    BinaryOperator::And if !left.is_truthy() => return Ok(left),
                    BinaryOperator::Or if left.is_truthy() => return Ok(left),
                    _ => {}
                }
                let right = right.evaluate(scope)?;
                Ok(apply_binary(*operator, left, right))
            }
            Node::Conditional {
                condition,
                consequent,
                alternative,
            } => {
                if condition.evaluate(scope)?.is_truthy() {
                    consequent.evaluate(scope)
                } else {
                    alternative.evaluate(scope)
                }
            }
        }
    }
}

fn apply_unary(operator: UnaryOperator, operand: Value) -> Value {
    match operator {
        UnaryOperator::Negate => Value::Number(-operand.to_number()),
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
        UnaryOperator::BitNot => Value::Number(!math::to_int32(operand.to_number()) as f64),
    }
}

fn apply_binary(operator: BinaryOperator, left: Value, right: Value) -> Value {
    use BinaryOperator::*;

    let (a, b) = (left.to_number(), right.to_number());
    let shift = math::to_uint32(b) & 31;
    match operator {
        And => {
            if left.is_truthy() {
                right
            } else {
                left
            }
        }
        Or => {
            if left.is_truthy() {
                left
            } else {
                right
            }
        }
        BitOr => Value::Number((math::to_int32(a) | math::to_int32(b)) as f64),
        BitXor => Value::Number((math::to_int32(a) ^ math::to_int32(b)) as f64),
        BitAnd => Value::Number((math::to_int32(a) & math::to_int32(b)) as f64),
        Equal => Value::Bool(loose_equal(left, right)),
        NotEqual => Value::Bool(!loose_equal(left, right)),
        StrictEqual => Value::Bool(strict_equal(left, right)),
        StrictNotEqual => Value::Bool(!strict_equal(left, right)),
        Less => Value::Bool(a < b),
        LessOrEqual => Value::Bool(a <= b),
        Greater => Value::Bool(a > b),
        GreaterOrEqual => Value::Bool(a >= b),
        ShiftLeft => Value::Number(math::to_int32(a).wrapping_shl(shift) as f64),
        ShiftRight => Value::Number((math::to_int32(a) >> shift) as f64),
        ShiftRightUnsigned => Value::Number((math::to_uint32(a) >> shift) as f64),
        Add => Value::Number(a + b),
        Subtract => Value::Number(a - b),
        Multiply => Value::Number(a * b),
        Divide => Value::Number(a / b),
        Remainder => Value::Number(a % b),
        Power => Value::Number(math::pow(a, b)),
    }
}

// undefined only equals itself; everything else compares as numbers
fn loose_equal(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) => true,
        (Value::Undefined, _) | (_, Value::Undefined) => false,
        _ => left.to_number() == right.to_number(),
    }
}

fn strict_equal(left: Value, right: Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Undefined, Value::Undefined) => true,
        _ => false,
    }
}

/// a compiled expression, callable once per cell per frame
#[derive(Debug, Clone)]
pub struct Evaluator {
    source: String,
    root: Option<Node>,
}

impl Evaluator {
    /// evaluate for one cell; failures come back as values, never panics
    pub fn call(&self, t: f64, i: f64, x: f64, y: f64) -> Result<Value, EvalError> {
        match &self.root {
            Some(root) => root.evaluate(&Scope { t, i, x, y }),
            None => Ok(Value::Undefined),
        }
    }

    /// the text this evaluator was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// compile source text. blank text compiles to an evaluator that is
/// undefined everywhere
pub fn compile(source: &str) -> Result<Evaluator, CompileError> {
    let root = parser::parse(source)?.map(Node::lower);
    debug!(source, blank = root.is_none(), "compiled expression");
    Ok(Evaluator {
        source: source.to_owned(),
        root,
    })
}
