use std::sync::LazyLock;
use rand::Rng;
use regex::{Captures, Regex};
use crate::{Config, Error};
use crate::roll::{RollRecord, Roller, Sides};


static DICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{0,9})[dD]([0-9]{1,9}|\{(-?[0-9]{1,9}), *(-?[0-9]{1,9})\})")
        .expect("dice regex must compile")
});


/// A pattern with every dice token replaced by its rolled total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// The arithmetic statement left after rolling.
    pub text: String,

    /// Die values of the groups small enough to list.
    pub rolls: Vec<RollRecord>,
}


/// Replaces every `NdS` and `Nd{L,H}` token of `pattern` by a roll.
///
/// A missing count means one die. Text between tokens is copied verbatim,
/// so `2d6+d{-1,1}*3` becomes something like `7+-1*3`.
///
/// # Errors
/// Returns [`Error::PatternTooLong`] before any roll if the pattern exceeds
/// `config.pattern_max_length` characters, or [`Error::Range`] if a token
/// describes an impossible range.
pub fn expand<R: Rng>(pattern: &str, config: &Config, rng: &mut R) -> Result<Expansion, Error> {
    let length = pattern.chars().count();
    if length > config.pattern_max_length {
        return Err(Error::PatternTooLong { length, limit: config.pattern_max_length });
    }

    let mut roller = Roller::builder().gauss_limit(config.gauss_limit);
    if config.show_rolls {
        roller = roller.record_limit(config.show_rolls_limit);
    }
    let roller = roller.build();

    let mut text = String::with_capacity(pattern.len());
    let mut rolls = Vec::new();
    let mut last = 0;

    for captures in DICE.captures_iter(pattern) {
        let Some(token) = captures.get(0) else { continue };
        let (count, sides) = token_parts(&captures)?;

        let outcome = roller.roll(count, sides, rng)?;
        text.push_str(&pattern[last..token.start()]);
        text.push_str(&outcome.total.to_string());
        last = token.end();

        rolls.extend(outcome.record);
    }
    text.push_str(&pattern[last..]);

    Ok(Expansion { text, rolls })
}

fn token_parts(captures: &Captures<'_>) -> Result<(u64, Sides), Error> {
    let count = match captures.get(1).map(|m| m.as_str()) {
        None | Some("") => 1,
        Some(digits) => number(digits)?,
    };

    let sides = match (captures.get(3), captures.get(4)) {
        (Some(low), Some(high)) => Sides::range(number(low.as_str())?, number(high.as_str())?)?,
        _ => {
            let digits = captures.get(2).map_or("", |m| m.as_str());
            Sides::Die(number(digits)?)
        }
    };

    Ok((count, sides))
}

fn number<T: std::str::FromStr>(digits: &str) -> Result<T, Error> {
    digits.parse().map_err(|_| Error::Range(format!("'{digits}' is not a dice number")))
}


#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use super::*;
    use crate::parse_to_expr;
    use crate::parser::str_test_strategies::dice_expression_strategy;

    fn expand_seeded(pattern: &str, config: &Config) -> Result<Expansion, Error> {
        expand(pattern, config, &mut StdRng::seed_from_u64(42))
    }

    fn total(pattern: &str) -> i64 {
        expand_seeded(pattern, &Config::default()).unwrap().text.parse().unwrap()
    }

    proptest! {
        #[test]
        fn test_regular_dice_bounds(count in 1u64..=150, size in 1u64..=100, seed: u64) {
            let pattern = format!("{count}d{size}");
            let mut rng = StdRng::seed_from_u64(seed);
            let value: i64 = expand(&pattern, &Config::default(), &mut rng).unwrap().text.parse().unwrap();

            prop_assert!(value >= count as i64);
            prop_assert!(value <= (count * size) as i64);
        }

        #[test]
        fn test_ranged_dice_bounds(count in 1u64..=150, low in -100i64..=100, width in 0i64..=100, seed: u64) {
            let high = low + width;
            let pattern = format!("{count}d{{{low}, {high}}}");
            let mut rng = StdRng::seed_from_u64(seed);
            let value: i64 = expand(&pattern, &Config::default(), &mut rng).unwrap().text.parse().unwrap();

            prop_assert!(value >= count as i64 * low);
            prop_assert!(value <= count as i64 * high);
        }

        #[test]
        fn test_expanded_dice_expressions_parse(pattern in dice_expression_strategy(), seed: u64) {
            let config = Config { pattern_max_length: usize::MAX, ..Config::default() };
            let expansion = expand(&pattern, &config, &mut StdRng::seed_from_u64(seed)).unwrap();
            let result = parse_to_expr(&expansion.text);

            prop_assert!(result.is_ok(), "{pattern} expanded to {} and gave {result:?}", expansion.text);
        }

        #[test]
        fn test_plain_text_is_untouched(pattern in "[0-9+*/() .a-ce-z]{0,64}") {
            let expansion = expand_seeded(&pattern, &Config::default()).unwrap();
            prop_assert_eq!(expansion.text, pattern);
        }
    }

    #[test]
    fn test_two_d_six() {
        for seed in 0..200 {
            let value: i64 = expand("2d6", &Config::default(), &mut StdRng::seed_from_u64(seed))
                .unwrap().text.parse().unwrap();
            assert!((2..=12).contains(&value));
        }
    }

    #[test]
    fn test_missing_count_is_one_die() {
        let value = total("d20");
        assert!((1..=20).contains(&value));

        let value = total("D{5,5}");
        assert_eq!(value, 5);
    }

    #[test]
    fn test_surrounding_text_is_copied() {
        let expansion = expand_seeded("(3d1+d{2,2})*10", &Config::default()).unwrap();
        assert_eq!(expansion.text, "(3+2)*10");
    }

    #[test]
    fn test_zero_dice() {
        assert_eq!(total("0d6"), 0);
        assert_eq!(total("5d0"), 0);
    }

    #[test]
    fn test_inverted_range_is_error() {
        let result = expand_seeded("1d{3,1}", &Config::default());
        assert!(matches!(result, Err(Error::Range(_))));
    }

    #[test]
    fn test_pattern_too_long() {
        let config = Config::default();
        let pattern = "1+".repeat(32) + "1";
        assert_eq!(
            expand_seeded(&pattern, &config),
            Err(Error::PatternTooLong { length: 65, limit: 64 })
        );

        let pattern = "1+".repeat(31) + "11";
        assert!(expand_seeded(&pattern, &config).is_ok());
    }

    #[test]
    fn test_records_only_when_shown() {
        let expansion = expand_seeded("3d6+2d4", &Config::default()).unwrap();
        assert!(expansion.rolls.is_empty());

        let config = Config { show_rolls: true, ..Config::default() };
        let expansion = expand_seeded("3d6+2d4+30d2", &config).unwrap();
        assert_eq!(expansion.rolls.len(), 2);
        assert_eq!(expansion.rolls[0].count, 3);
        assert_eq!(expansion.rolls[0].sides, Sides::Die(6));
        assert_eq!(expansion.rolls[1].count, 2);
    }
}
