use std::fmt::Display;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::trace;
use crate::Error;


/// Upper bound on normal draws before the approximation gives up on
/// rejection and clamps into the feasible range.
pub const MAX_GAUSS_ATTEMPTS: usize = 1000;


/// What a single die can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sides {
    /// A regular die numbered `1..=n`.
    Die(u64),

    /// A die showing any integer in `low..=high`.
    Range {
        /// Smallest face.
        low: i64,
        /// Largest face.
        high: i64
    }
}

impl Sides {
    /// Creates a [`Sides::Range`], checking that `low <= high`.
    ///
    /// # Errors
    /// Returns [`Error::Range`] if `low > high`.
    pub fn range(low: i64, high: i64) -> Result<Self, Error> {
        if low > high {
            return Err(Error::Range(format!("{{{low},{high}}} has its low end above its high end")));
        }

        Ok(Sides::Range { low, high })
    }
}

impl Display for Sides {
    /// Formats the sides the way they are written in dice notation.
    ///
    /// # Examples
    /// ```
    /// use dice_calc::Sides;
    ///
    /// assert_eq!(Sides::Die(20).to_string(), "20");
    /// assert_eq!(Sides::Range { low: -1, high: 1 }.to_string(), "{-1,1}");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sides::Die(n) => write!(f, "{n}"),
            Sides::Range { low, high } => write!(f, "{{{low},{high}}}")
        }
    }
}


/// Individual die values of one rolled dice group, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRecord {
    /// Number of dice in the group.
    pub count: u64,
    /// Faces of each die.
    pub sides: Sides,
    /// One value per die, in roll order.
    pub values: Vec<i64>
}

impl Display for RollRecord {
    /// Formats as `NdS: v1 v2 v3`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        write!(f, "{}d{}: {}", self.count, self.sides, values.join(" "))
    }
}


/// The sum of a dice group and, when recording was requested and the
/// group was small enough, the values that made it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Sum of the group.
    pub total: i64,
    /// Individual values, if recorded.
    pub record: Option<RollRecord>
}

impl RollOutcome {
    fn total(total: i64) -> Self {
        Self { total, record: None }
    }
}


/// Rolls groups of dice.
///
/// Groups smaller than the gauss limit are rolled die by die. Larger groups
/// are drawn from the normal approximation of the sum, so the cost stays
/// constant however many dice are requested.
///
/// Create one with [`Roller::builder()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roller {
    gauss_limit: u64,
    record_limit: Option<u64>
}

impl Roller {
    /// Creates a new [`RollerBuilder`] with a gauss limit of 100 and recording off.
    ///
    /// # Examples
    /// ```
    /// use dice_calc::{Roller, Sides};
    ///
    /// let roller = Roller::builder()
    ///     .gauss_limit(50)
    ///     .record_limit(10)
    ///     .build();
    ///
    /// let outcome = roller.roll(3, Sides::Die(6), &mut rand::rng()).unwrap();
    /// assert!((3..=18).contains(&outcome.total));
    /// assert_eq!(outcome.record.unwrap().values.len(), 3);
    /// ```
    pub fn builder() -> RollerBuilder {
        RollerBuilder::new()
    }

    /// Rolls `count` dice with the given `sides` and sums them.
    ///
    /// The total always lies within `count * low ..= count * high`.
    ///
    /// # Errors
    /// Returns [`Error::Range`] if the range is inverted or the extreme sums
    /// do not fit in an `i64`.
    pub fn roll<R: Rng>(&self, count: u64, sides: Sides, rng: &mut R) -> Result<RollOutcome, Error> {
        let (low, high) = match sides {
            Sides::Die(0) => return Ok(RollOutcome::total(0)),
            Sides::Die(1) => return Ok(RollOutcome::total(to_i64(count)?)),
            Sides::Die(n) => (1, to_i64(n)?),
            Sides::Range { low, high } => {
                Sides::range(low, high)?;
                (low, high)
            }
        };

        if count == 0 {
            return Ok(RollOutcome::total(0));
        }

        let signed_count = to_i64(count)?;
        let min = signed_count.checked_mul(low).ok_or_else(|| too_large(count, sides))?;
        let max = signed_count.checked_mul(high).ok_or_else(|| too_large(count, sides))?;

        if low == high {
            return Ok(RollOutcome::total(min));
        }

        if count < self.gauss_limit {
            Ok(self.exact(count, sides, (low, high), rng))
        } else {
            approximate(count, (low, high), (min, max), rng).map(RollOutcome::total)
        }
    }

    fn exact<R: Rng>(&self, count: u64, sides: Sides, (low, high): (i64, i64), rng: &mut R) -> RollOutcome {
        let keep = self.record_limit.is_some_and(|limit| count < limit);
        let mut values = Vec::new();
        let mut total = 0i64;

        for _ in 0..count {
            let value = rng.random_range(low..=high);
            total += value;
            if keep {
                values.push(value);
            }
        }

        let record = keep.then(|| RollRecord { count, sides, values });
        RollOutcome { total, record }
    }
}

impl Default for Roller {
    fn default() -> Self {
        Roller::builder().build()
    }
}


/// Draws the sum of `count` uniform dice from its normal approximation.
///
/// Draws outside the feasible range are rejected. After
/// [`MAX_GAUSS_ATTEMPTS`] rejections the last draw is clamped.
fn approximate<R: Rng>(count: u64, (low, high): (i64, i64), (min, max): (i64, i64), rng: &mut R) -> Result<i64, Error> {
    let count = count as f64;
    let faces = (high as f64) - (low as f64) + 1.0;
    let mean = count * (low as f64 + high as f64) / 2.0;
    let variance = count * (faces * faces - 1.0) / 12.0;

    let normal = Normal::new(mean, variance.sqrt())
        .map_err(|err| Error::Range(err.to_string()))?;

    trace!(mean, variance, "approximating dice sum");
    let draws = std::iter::repeat_with(|| normal.sample(&mut *rng).trunc()).take(MAX_GAUSS_ATTEMPTS);
    Ok(first_feasible(draws, (min, max)))
}

/// The first draw inside `min..=max`, or the last draw clamped into it.
fn first_feasible(draws: impl Iterator<Item = f64>, (min, max): (i64, i64)) -> i64 {
    let feasible = (min as f64)..=(max as f64);
    let mut last = None;

    for (attempt, draw) in draws.enumerate() {
        if feasible.contains(&draw) {
            trace!(attempt, draw, "accepted draw");
            return draw as i64;
        }
        last = Some(draw);
    }

    trace!(?last, "rejection limit reached, clamping");
    last.map_or(min, |draw| draw as i64).clamp(min, max)
}

fn to_i64(value: u64) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| Error::Range(format!("{value} is too large")))
}

fn too_large(count: u64, sides: Sides) -> Error {
    Error::Range(format!("{count}d{sides} does not fit in a 64-bit sum"))
}


/// A builder for [`Roller`] with a fluent API.
#[derive(Debug, Clone)]
pub struct RollerBuilder {
    gauss_limit: u64,
    record_limit: Option<u64>
}

impl RollerBuilder {
    fn new() -> Self {
        Self {
            gauss_limit: 100,
            record_limit: None
        }
    }

    /// Groups with at least this many dice use the normal approximation.
    pub fn gauss_limit(mut self, gauss_limit: u64) -> Self {
        self.gauss_limit = gauss_limit;
        self
    }

    /// Record individual values of groups with fewer than `limit` dice.
    pub fn record_limit(mut self, limit: u64) -> Self {
        self.record_limit = Some(limit);
        self
    }

    /// Record nothing.
    pub fn no_records(mut self) -> Self {
        self.record_limit = None;
        self
    }

    /// Builds the [`Roller`].
    pub fn build(self) -> Roller {
        Roller {
            gauss_limit: self.gauss_limit,
            record_limit: self.record_limit
        }
    }
}
