use proptest::prelude::*;


pub(crate) fn simple_number_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..=1000).prop_map(|n| n.to_string()),
        (1u32..=1000, 1u32..=99).prop_map(|(int, frac)| format!("{int}.{frac}")),
    ]
}

pub(crate) fn constant_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("pi"), Just("tau"), Just("e")].prop_map(String::from)
}

pub(crate) fn simple_dice_strategy() -> impl Strategy<Value = String> {
    (prop::option::of(0u32..=200), 1u32..=1000)
        .prop_map(|(count, size)| match count {
            Some(count) => format!("{count}d{size}"),
            None => format!("d{size}")
        })
}

pub(crate) fn ranged_dice_strategy() -> impl Strategy<Value = String> {
    (1u32..=50, -100i32..=100, 0i32..=100)
        .prop_map(|(count, low, width)| format!("{count}d{{{low},{}}}", low + width))
}

pub(crate) fn parenthesized_strategy(inner: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    inner.prop_map(|expr| format!("({})", expr))
}

pub(crate) fn call_strategy(inner: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("max"), Just("min"), Just("abs"), Just("round")],
        prop::collection::vec(inner, 1..3)
    ).prop_map(|(name, args)| format!("{name}({})", args.join(", ")))
}

pub(crate) fn binary_operation_strategy(
    left: impl Strategy<Value = String>,
    right: impl Strategy<Value = String>
) -> impl Strategy<Value = String> {
    (
        left,
        prop_oneof![
            Just("+"), Just("-"), Just("*"), Just("/"), Just("//"),
            Just("%"), Just("**"), Just("&"), Just("|"), Just("^"),
        ],
        right
    ).prop_map(|(l, op, r)| format!("{} {} {}", l, op, r))
}

/// Syntactically valid expressions in the post-expansion grammar.
pub(crate) fn arithmetic_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        simple_number_strategy(),
        constant_strategy(),
    ];

    leaf.prop_recursive(4, 32, 10, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            inner.clone().prop_map(|expr| format!("-{expr}")),
            call_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}

/// Arithmetic over numbers and dice tokens, as typed before expansion.
pub(crate) fn dice_expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        simple_number_strategy(),
        simple_dice_strategy(),
        ranged_dice_strategy(),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            parenthesized_strategy(inner.clone()),
            call_strategy(inner.clone()),
            binary_operation_strategy(inner.clone(), inner),
        ]
    })
}
