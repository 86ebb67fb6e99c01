use proptest::prelude::*;
use crate::roll::{Roller, Sides};


pub(crate) fn sides_strategy() -> impl Strategy<Value = Sides> {
    prop_oneof![
        (0u64..=1000).prop_map(Sides::Die),
        (-1000i64..=1000, 0i64..=1000).prop_map(|(low, width)| Sides::Range { low, high: low + width }),
    ]
}

pub(crate) fn roller_strategy() -> impl Strategy<Value = Roller> {
    (0u64..=200, proptest::option::of(0u64..=50))
        .prop_map(|(gauss_limit, record_limit)| {
            let builder = Roller::builder().gauss_limit(gauss_limit);
            match record_limit {
                Some(limit) => builder.record_limit(limit).build(),
                None => builder.build()
            }
        })
}
