//! properties of the glyph mapping and the compiler: radius and tone follow
//! the value, and no source text can make compiling or evaluating panic

use proptest::prelude::*;
use tixy::compiler::compile;
use tixy::grid::{Glyph, Tone, MAX_RADIUS};

/// short strings drawn mostly from the expression alphabet
fn arb_source() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("t"),
            Just("i"),
            Just("x"),
            Just("y"),
            Just("sin"),
            Just("PI"),
            Just("q"),
            Just("1"),
            Just(".5"),
            Just("("),
            Just(")"),
            Just(","),
            Just("+"),
            Just("-"),
            Just("*"),
            Just("**"),
            Just("/"),
            Just("%"),
            Just("&"),
            Just("|"),
            Just("^"),
            Just("~"),
            Just("!"),
            Just("<<"),
            Just(">>>"),
            Just("=="),
            Just("<"),
            Just("&&"),
            Just("?"),
            Just(":"),
            Just(" "),
            Just("@"),
        ],
        0..=40,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        -2.0f64..2.0,
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(-0.0),
    ]
}

// glyph mapping

proptest! {
    #[test]
    fn radius_is_clamped_magnitude(v in arb_value()) {
        let glyph = Glyph::from_value(v);
        prop_assert!(glyph.radius >= 0.0 && glyph.radius <= MAX_RADIUS);
        if v.is_nan() {
            prop_assert_eq!(glyph, Glyph::EMPTY);
        } else {
            prop_assert_eq!(glyph.radius, v.abs().min(1.0) * MAX_RADIUS);
        }
    }

    #[test]
    fn accent_iff_negative(v in arb_value()) {
        let glyph = Glyph::from_value(v);
        prop_assert_eq!(glyph.tone == Tone::Accent, v < 0.0);
    }
}

// compiler totality

proptest! {
    #[test]
    fn compile_never_panics(source in "\\PC{0,40}") {
        let _ = compile(&source);
    }

    #[test]
    fn evaluation_never_panics(
        source in arb_source(),
        t in -100.0f64..100.0,
        i in 0u32..256,
    ) {
        if let Ok(evaluator) = compile(&source) {
            let _ = evaluator.call(t, f64::from(i), f64::from(i % 16), f64::from(i / 16));
        }
    }

    #[test]
    fn compilation_is_deterministic(source in arb_source(), t in 0.0f64..10.0) {
        match (compile(&source), compile(&source)) {
            (Ok(a), Ok(b)) => {
                let (ra, rb) = (a.call(t, 17.0, 1.0, 1.0), b.call(t, 17.0, 1.0, 1.0));
                match (ra, rb) {
                    (Ok(va), Ok(vb)) => {
                        let (na, nb) = (va.to_number(), vb.to_number());
                        prop_assert!(na == nb || (na.is_nan() && nb.is_nan()));
                    }
                    (ea, eb) => prop_assert_eq!(ea.is_err(), eb.is_err()),
                }
            }
            (a, b) => prop_assert_eq!(a.is_ok(), b.is_ok()),
        }
    }
}
