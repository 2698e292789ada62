use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One slice of a progressive tax table.
///
/// `upper_limit` of `None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_limit: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        upper_limit: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_limit: Some(upper_limit),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_limit: None,
            rate,
        }
    }

    /// Orders brackets ascending by upper limit with the unbounded bracket last.
    pub fn cmp_by_limit(
        &self,
        other: &Self,
    ) -> Ordering {
        match (self.upper_limit, other.upper_limit) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("bracket rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error("bracket upper limit must be positive, got {0}")]
    InvalidLimit(Decimal),

    #[error("bracket limits must be strictly increasing, {0} follows {1}")]
    NotIncreasing(Decimal, Decimal),

    #[error("only the last bracket may be unbounded")]
    UnboundedNotLast,

    #[error("the last bracket must be unbounded")]
    MissingUnboundedBracket,
}

/// A validated progressive tax table.
///
/// Brackets partition `[0, ∞)` without gaps: limits strictly increase and
/// the final bracket is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketSchedule {
    brackets: Vec<TaxBracket>,
}

impl BracketSchedule {
    /// Sorts and validates `brackets`.
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, BracketScheduleError> {
        if brackets.is_empty() {
            return Err(BracketScheduleError::Empty);
        }
        brackets.sort_by(TaxBracket::cmp_by_limit);

        let last = brackets.len() - 1;
        let mut previous: Option<Decimal> = None;
        for (i, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketScheduleError::InvalidRate(bracket.rate));
            }
            match bracket.upper_limit {
                Some(limit) if limit <= Decimal::ZERO => {
                    return Err(BracketScheduleError::InvalidLimit(limit));
                }
                Some(limit) => {
                    if i == last {
                        return Err(BracketScheduleError::MissingUnboundedBracket);
                    }
                    match previous {
                        Some(prev) if limit <= prev => {
                            return Err(BracketScheduleError::NotIncreasing(limit, prev));
                        }
                        _ => {}
                    }
                    previous = Some(limit);
                }
                None if i != last => return Err(BracketScheduleError::UnboundedNotLast),
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// A single unbounded bracket, used for jurisdictions with a flat rate.
    pub fn flat(rate: Decimal) -> Result<Self, BracketScheduleError> {
        Self::new(vec![TaxBracket::unbounded(rate)])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketSchedule {
    type Error = BracketScheduleError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketSchedule> for Vec<TaxBracket> {
    fn from(schedule: BracketSchedule) -> Self {
        schedule.brackets
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_sorts_brackets_by_limit() {
        let schedule = BracketSchedule::new(vec![
            TaxBracket::unbounded(dec!(0.25)),
            TaxBracket::new(dec!(50000), dec!(0.15)),
        ])
        .unwrap();

        assert_eq!(schedule.brackets()[0].upper_limit, Some(dec!(50000)));
        assert_eq!(schedule.brackets()[1].upper_limit, None);
    }

    #[test]
    fn new_rejects_empty_schedule() {
        assert_eq!(BracketSchedule::new(vec![]), Err(BracketScheduleError::Empty));
    }

    #[test]
    fn new_rejects_missing_unbounded_bracket() {
        let result = BracketSchedule::new(vec![TaxBracket::new(dec!(50000), dec!(0.15))]);

        assert_eq!(result, Err(BracketScheduleError::MissingUnboundedBracket));
    }

    #[test]
    fn new_rejects_two_unbounded_brackets() {
        let result = BracketSchedule::new(vec![
            TaxBracket::unbounded(dec!(0.15)),
            TaxBracket::unbounded(dec!(0.25)),
        ]);

        assert_eq!(result, Err(BracketScheduleError::UnboundedNotLast));
    }

    #[test]
    fn new_rejects_duplicate_limits() {
        let result = BracketSchedule::new(vec![
            TaxBracket::new(dec!(50000), dec!(0.15)),
            TaxBracket::new(dec!(50000), dec!(0.20)),
            TaxBracket::unbounded(dec!(0.25)),
        ]);

        assert_eq!(
            result,
            Err(BracketScheduleError::NotIncreasing(dec!(50000), dec!(50000)))
        );
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let result = BracketSchedule::new(vec![TaxBracket::unbounded(dec!(1.5))]);

        assert_eq!(result, Err(BracketScheduleError::InvalidRate(dec!(1.5))));
    }

    #[test]
    fn new_rejects_non_positive_limit() {
        let result = BracketSchedule::new(vec![
            TaxBracket::new(dec!(0), dec!(0.10)),
            TaxBracket::unbounded(dec!(0.25)),
        ]);

        assert_eq!(result, Err(BracketScheduleError::InvalidLimit(dec!(0))));
    }

    #[test]
    fn flat_builds_single_unbounded_bracket() {
        let schedule = BracketSchedule::flat(dec!(0.0495)).unwrap();

        assert_eq!(schedule.brackets(), &[TaxBracket::unbounded(dec!(0.0495))]);
    }
}
