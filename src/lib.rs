#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]

//! Dice notation expansion and sandboxed arithmetic.
//!
//! A pattern such as `2d6+1d20*2` has its dice tokens replaced by rolled
//! totals, the remaining statement is parsed and evaluated under explicit
//! bounds, and the result is rendered as a short reply.


#[cfg(test)]
mod roll_test_strategies;

mod error;
mod number;
mod roll;
mod parser;
mod eval;
mod expand;
mod format;
pub mod config;
pub mod logging;

use rand::Rng;
use tracing::{debug, warn};

pub use error::Error;
pub use number::Number;
pub use roll::{Roller, RollerBuilder, RollOutcome, RollRecord, Sides, MAX_GAUSS_ATTEMPTS};
pub use parser::{
    ParserError, Parser,
    Expr, UnaryOperator, BinaryOperator,
    parse_to_expr
};
pub use eval::{Argument, Evaluator, Function, Limits};
pub use expand::{expand, Expansion};
pub use format::format_result;
pub use config::{Config, ConfigError, load_config_file};


/// The reply to any pattern that cannot be rolled.
pub const BAD_PATTERN: &str = "Bad pattern 3:<";

/// The reply to `help`.
pub const USAGE: &str = "\
Usage: roll [pattern]
Rolls dice and does arithmetic with the results.
  2d6+3        two six-sided dice plus three
  d20          one twenty-sided die
  4d{-1,1}     four dice showing -1, 0 or 1
  max(1d6, 1d8) * 2
Without a pattern a single d6 is rolled.
Operators: + - * / // % ** & | ^ ~ << >>
Functions: abs ceil floor round trunc min max sqrt exp log factorial and more";


/// Rolls `pattern` and renders the result.
///
/// A blank pattern rolls a single d6.
///
/// # Errors
/// Returns the first [`Error`] met while expanding, parsing, evaluating or
/// formatting.
///
/// # Examples
/// ```
/// use dice_calc::{try_roll, Config};
///
/// let reply = try_roll("1+2*3", &Config::default(), &mut rand::rng()).unwrap();
/// assert_eq!(reply, "7");
/// ```
pub fn try_roll<R: Rng>(pattern: &str, config: &Config, rng: &mut R) -> Result<String, Error> {
    if pattern.trim().is_empty() {
        let outcome = Roller::default().roll(1, Sides::Die(6), rng)?;
        return Ok(outcome.total.to_string());
    }

    let expansion = expand(pattern, config, rng)?;
    debug!(statement = %expansion.text, rolls = expansion.rolls.len(), "expanded pattern");

    let expr = parse_to_expr(&expansion.text)?;
    let value = Evaluator::new(&config.limits).evaluate(&expr)?;

    format_result(value, &expansion.text, &expansion.rolls, config)
}

/// Rolls `pattern` with the thread-local RNG.
///
/// Never fails: any error is logged and answered with [`BAD_PATTERN`].
pub fn roll_pattern(pattern: &str, config: &Config) -> String {
    debug!(pattern, "handling pattern");

    match try_roll(pattern, config, &mut rand::rng()) {
        Ok(reply) => reply,
        Err(err) => {
            warn!(pattern, error = %err, "failed to roll pattern");
            BAD_PATTERN.to_string()
        }
    }
}

/// Answers one command line: `help` gives [`USAGE`], anything else is rolled.
pub fn handle_command(args: &str, config: &Config) -> String {
    if args.trim().eq_ignore_ascii_case("help") {
        return USAGE.to_string();
    }

    roll_pattern(args, config)
}
