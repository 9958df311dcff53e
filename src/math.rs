//! the names an expression can use without qualification
//!
//! This is the allow-list standing in for JavaScript's `Math` object plus the
//! few globals (`Infinity`, `NaN`, `undefined`) tixy code relies on. Functions
//! follow JavaScript argument rules: a missing argument is `NaN` and extra
//! arguments are ignored.
use std::f64::consts;

#[derive(Debug, Clone, Copy)]
pub enum Function {
    Nullary(fn() -> f64),
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    Variadic(fn(&[f64]) -> f64),
}

impl Function {
    pub fn apply(&self, arguments: &[f64]) -> f64 {
        let argument = |n: usize| arguments.get(n).copied().unwrap_or(f64::NAN);
        match self {
            Function::Nullary(f) => f(),
            Function::Unary(f) => f(argument(0)),
            Function::Binary(f) => f(argument(0), argument(1)),
            Function::Variadic(f) => f(arguments),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Symbol {
    Constant(f64),
    Undefined,
    Callable(Function),
}

pub fn lookup(name: &str) -> Option<Symbol> {
    use Function::*;
    use Symbol::{Callable, Constant, Undefined};

    let symbol = match name {
        "E" => Constant(consts::E),
        "LN2" => Constant(consts::LN_2),
        "LN10" => Constant(consts::LN_10),
        "LOG2E" => Constant(consts::LOG2_E),
        "LOG10E" => Constant(consts::LOG10_E),
        "PI" => Constant(consts::PI),
        "SQRT1_2" => Constant(consts::FRAC_1_SQRT_2),
        "SQRT2" => Constant(consts::SQRT_2),
        "Infinity" => Constant(f64::INFINITY),
        "NaN" => Constant(f64::NAN),
        "undefined" => Undefined,

        "abs" => Callable(Unary(f64::abs)),
        "acos" => Callable(Unary(f64::acos)),
        "acosh" => Callable(Unary(f64::acosh)),
        "asin" => Callable(Unary(f64::asin)),
        "asinh" => Callable(Unary(f64::asinh)),
        "atan" => Callable(Unary(f64::atan)),
        "atan2" => Callable(Binary(f64::atan2)),
        "atanh" => Callable(Unary(f64::atanh)),
        "cbrt" => Callable(Unary(f64::cbrt)),
        "ceil" => Callable(Unary(f64::ceil)),
        "clz32" => Callable(Unary(|n| to_uint32(n).leading_zeros() as f64)),
        "cos" => Callable(Unary(f64::cos)),
        "cosh" => Callable(Unary(f64::cosh)),
        "exp" => Callable(Unary(f64::exp)),
        "expm1" => Callable(Unary(f64::exp_m1)),
        "floor" => Callable(Unary(f64::floor)),
        "fround" => Callable(Unary(|n| n as f32 as f64)),
        "hypot" => Callable(Variadic(hypot)),
        "imul" => Callable(Binary(|a, b| to_int32(a).wrapping_mul(to_int32(b)) as f64)),
        "log" => Callable(Unary(f64::ln)),
        "log1p" => Callable(Unary(f64::ln_1p)),
        "log10" => Callable(Unary(f64::log10)),
        "log2" => Callable(Unary(f64::log2)),
        "max" => Callable(Variadic(max)),
        "min" => Callable(Variadic(min)),
        "pow" => Callable(Binary(pow)),
        "random" => Callable(Nullary(rand::random::<f64>)),
        "round" => Callable(Unary(round)),
        "sign" => Callable(Unary(sign)),
        "sin" => Callable(Unary(f64::sin)),
        "sinh" => Callable(Unary(f64::sinh)),
        "sqrt" => Callable(Unary(f64::sqrt)),
        "tan" => Callable(Unary(f64::tan)),
        "tanh" => Callable(Unary(f64::tanh)),
        "trunc" => Callable(Unary(f64::trunc)),
        _ => return None,
    };
    Some(symbol)
}

/// `**` as JavaScript defines it: a NaN exponent, or `±1` raised to an
/// infinity, is NaN where `f64::powf` would give 1
pub fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// ECMAScript ToInt32
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ECMAScript ToUint32
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

// rounds half up: 2.5 becomes 3, -2.5 becomes -2
fn round(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

// unlike f64::signum, zero keeps its sign
fn sign(n: f64) -> f64 {
    if n > 0.0 {
        1.0
    } else if n < 0.0 {
        -1.0
    } else {
        n
    }
}

fn max(arguments: &[f64]) -> f64 {
    arguments
        .iter()
        .try_fold(f64::NEG_INFINITY, |acc, &n| {
            if n.is_nan() {
                None
            } else {
                Some(acc.max(n))
            }
        })
        .unwrap_or(f64::NAN)
}

fn min(arguments: &[f64]) -> f64 {
    arguments
        .iter()
        .try_fold(f64::INFINITY, |acc, &n| {
            if n.is_nan() {
                None
            } else {
                Some(acc.min(n))
            }
        })
        .unwrap_or(f64::NAN)
}

fn hypot(arguments: &[f64]) -> f64 {
    if arguments.iter().any(|n| n.is_infinite()) {
        return f64::INFINITY;
    }
    arguments.iter().map(|n| n * n).sum::<f64>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: &[f64]) -> f64 {
        match lookup(name) {
            Some(Symbol::Callable(function)) => function.apply(arguments),
            _ => panic!("{name} is not a function"),
        }
    }

    #[test]
    fn test_constants() {
        assert!(matches!(lookup("PI"), Some(Symbol::Constant(pi)) if pi == consts::PI));
        assert!(matches!(lookup("Infinity"), Some(Symbol::Constant(inf)) if inf.is_infinite()));
        assert!(matches!(lookup("undefined"), Some(Symbol::Undefined)));
        assert!(lookup("window").is_none());
        assert!(lookup("pi").is_none());
    }

    #[test]
    fn test_missing_argument_is_nan() {
        assert!(call("sin", &[]).is_nan());
        assert!(call("atan2", &[1.0]).is_nan());
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        assert_eq!(call("abs", &[-2.0, 7.0]), 2.0);
    }

    #[test]
    fn test_variadic() {
        assert_eq!(call("max", &[1.0, 5.0, 3.0]), 5.0);
        assert_eq!(call("min", &[1.0, 5.0, -3.0]), -3.0);
        assert_eq!(call("max", &[]), f64::NEG_INFINITY);
        assert!(call("max", &[1.0, f64::NAN]).is_nan());
        assert_eq!(call("hypot", &[3.0, 4.0]), 5.0);
        assert_eq!(call("hypot", &[f64::NAN, f64::INFINITY]), f64::INFINITY);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(call("round", &[2.5]), 3.0);
        assert_eq!(call("round", &[-2.5]), -2.0);
        assert_eq!(call("round", &[-0.4]), 0.0);
        assert!(call("round", &[f64::NAN]).is_nan());
    }

    #[test]
    fn test_pow() {
        assert_eq!(call("pow", &[2.0, 10.0]), 1024.0);
        assert_eq!(call("pow", &[f64::NAN, 0.0]), 1.0);
        assert!(call("pow", &[1.0, f64::NAN]).is_nan());
        assert!(call("pow", &[-1.0, f64::INFINITY]).is_nan());
    }

    #[test]
    fn test_sign() {
        assert_eq!(call("sign", &[-3.0]), -1.0);
        assert_eq!(call("sign", &[0.0]), 0.0);
        assert!(call("sign", &[f64::NAN]).is_nan());
    }

    #[test]
    fn test_int32_conversion() {
        assert_eq!(to_int32(1.9), 1);
        assert_eq!(to_int32(-1.9), -1);
        assert_eq!(to_int32(4_294_967_296.0 + 5.0), 5);
        assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(call("imul", &[0xffff_ffffu32 as f64, 5.0]), -5.0);
        assert_eq!(call("clz32", &[1.0]), 31.0);
    }

    #[test]
    fn test_random_is_a_unit_fraction() {
        for _ in 0..100 {
            let n = call("random", &[]);
            assert!((0.0..1.0).contains(&n));
        }
    }
}
