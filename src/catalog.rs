//! built-in examples, each paired with a comment explaining it
//!
//! The table only feeds the comment panel and the "next example" key; it
//! never affects evaluation.

pub struct Example {
    /// one or two lines, separated by `\n`
    pub comment: &'static str,
    pub code: &'static str,
}

pub const EXAMPLES: &[Example] = &[
    Example {
        comment: "for every dot return 0 or 1\nto change the visibility",
        code: "Math.random() < 0.1",
    },
    Example {
        comment: "use a float between 0 and 1\nto define the size",
        code: "Math.random()",
    },
    Example {
        comment: "parameter `t` is\nthe time in seconds",
        code: "Math.sin(t)",
    },
    Example {
        comment: "param `i` is the index\nof the dot (0..255)",
        code: "i / 256",
    },
    Example {
        comment: "`x` is the column index\nfrom 0 to 15",
        code: "x / 16",
    },
    Example {
        comment: "`y` is the row\nalso from 0 to 15",
        code: "y / 16",
    },
    Example {
        comment: "positive numbers are white,\nnegatives are red",
        code: "y - 7.5",
    },
    Example {
        comment: "use the time\nto animate values",
        code: "y - t",
    },
    Example {
        comment: "multiply the time\nto change the speed",
        code: "y - t * 4",
    },
    Example {
        comment: "skip `Math.` to use methods\nand props like `sin` or `PI`",
        code: "sin(t - sqrt((x - 7.5) ** 2 + (y - 6) ** 2))",
    },
    Example {
        comment: "more examples ...",
        code: "sin(y / 8 + t)",
    },
    Example {
        comment: "simple triangle",
        code: "y - x",
    },
    Example {
        comment: "quarter triangle",
        code: "(y > x) && (14 - x < y)",
    },
    Example {
        comment: "pattern",
        code: "i % 4 - y % 4",
    },
    Example {
        comment: "square",
        code: "x > 3 & y > 3 & x < 12 & y < 12",
    },
    Example {
        comment: "animated square",
        code: "-(x > t & y > t & x < 15 - t & y < 15 - t)",
    },
    Example {
        comment: "mondrian squares",
        code: "(y - 6) * (x - 6)",
    },
    Example {
        comment: "moving cross",
        code: "(y - 4 * t | 0) * (x - 2 - t | 0)",
    },
    Example {
        comment: "sierpinski",
        code: "4 * t & i & x & y",
    },
    Example {
        comment: "binary clock",
        code: "(t * 10) & (1 << x) && y == 8",
    },
    Example {
        comment: "random noise",
        code: "random() * 2 - 1",
    },
    Example {
        comment: "static smooth noise",
        code: "sin(i ** 2)",
    },
    Example {
        comment: "animated smooth noise",
        code: "cos(t + i + x * y)",
    },
    Example {
        comment: "waves",
        code: "sin(x / 2) - sin(x - t) - y + 6",
    },
    Example {
        comment: "bloop bloop bloop",
        code: "(x - 8) * (y - 8) - sin(t) * 64",
    },
    Example {
        comment: "fireworks",
        code: "-.4 / (hypot(x - t % 10, y - t % 8) - t % 2 * 9)",
    },
    Example {
        comment: "ripples",
        code: "sin(t - sqrt(x * x + y * y))",
    },
    Example {
        comment: "sticky blood",
        code: "y - t * 3 + 9 + 3 * cos(x * 3 - t) - 5 * sin(x * 7)",
    },
    Example {
        comment: "3d checker board",
        code: "(((x - 8) / y + t * 5) & 1 ^ 1 / y * 8 & 1) * y / 5",
    },
    Example {
        comment: "dialogue with an AI",
        code: "1 / 32 * tan(t / 64 * x * tan(i - x))",
    },
    Example {
        comment: "shows a circle",
        code: "8 * t % 13 - hypot(x - 7.5, y - 7.5)",
    },
];

/// the example tixy opens with
pub fn first() -> &'static Example {
    &EXAMPLES[0]
}

/// the comment of the example whose code is exactly `code`
pub fn annotation(code: &str) -> Option<&'static str> {
    EXAMPLES
        .iter()
        .find(|example| example.code == code)
        .map(|example| example.comment)
}

/// the example after `code`. code that is not an example leads to the
/// first one; the last example has no next
pub fn next(code: &str) -> Option<&'static Example> {
    match EXAMPLES.iter().position(|example| example.code == code) {
        Some(index) => EXAMPLES.get(index + 1),
        None => Some(first()),
    }
}

/// lay a comment out on the two panel lines, `// ` prefixed. a single line
/// goes on the bottom one
pub fn comment_lines(comment: &str) -> [String; 2] {
    let mut lines = comment.lines();
    match (lines.next(), lines.next()) {
        (Some(first), Some(second)) => [format!("// {first}"), format!("// {second}")],
        (Some(only), None) => [String::new(), format!("// {only}")],
        _ => [String::new(), String::new()],
    }
}
