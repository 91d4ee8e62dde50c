//! Units and conversion factors for the dimensional analysis game.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Mass,
    Volume,
    Amount,
    Length,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Unit {
    Milligram,
    Gram,
    Kilogram,
    Millilitre,
    Litre,
    CubicCentimetre,
    Millimole,
    Mole,
    Millimetre,
    Centimetre,
    Metre,
    Kilometre,
    Second,
    Minute,
    Hour,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Self::Milligram | Self::Gram | Self::Kilogram => Dimension::Mass,
            Self::Millilitre | Self::Litre | Self::CubicCentimetre => Dimension::Volume,
            Self::Millimole | Self::Mole => Dimension::Amount,
            Self::Millimetre | Self::Centimetre | Self::Metre | Self::Kilometre => {
                Dimension::Length
            }
            Self::Second | Self::Minute | Self::Hour => Dimension::Time,
        }
    }

    /// Size of one of this unit in the base unit of its dimension
    /// (gram, litre, mole, metre, second).
    pub fn to_base(self) -> f64 {
        match self {
            Self::Milligram => 1e-3,
            Self::Gram => 1.0,
            Self::Kilogram => 1e3,
            Self::Millilitre | Self::CubicCentimetre => 1e-3,
            Self::Litre => 1.0,
            Self::Millimole => 1e-3,
            Self::Mole => 1.0,
            Self::Millimetre => 1e-3,
            Self::Centimetre => 1e-2,
            Self::Metre => 1.0,
            Self::Kilometre => 1e3,
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3600.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Milligram => "mg",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Millilitre => "mL",
            Self::Litre => "L",
            Self::CubicCentimetre => "cm³",
            Self::Millimole => "mmol",
            Self::Mole => "mol",
            Self::Millimetre => "mm",
            Self::Centimetre => "cm",
            Self::Metre => "m",
            Self::Kilometre => "km",
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("cannot convert {from} to {to}: different dimensions")]
    IncompatibleUnits { from: Unit, to: Unit },
    #[error("factor {step} expects {expected} on the bottom but the value is in {found}")]
    UnitDoesNotCancel {
        step: usize,
        expected: Unit,
        found: Unit,
    },
}

pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    if from.dimension() != to.dimension() {
        return Err(UnitError::IncompatibleUnits { from, to });
    }
    Ok(value * from.to_base() / to.to_base())
}

/// A conversion factor written as a fraction, e.g. `1000 mg / 1 g`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConversionFactor {
    pub numerator: f64,
    pub numerator_unit: Unit,
    pub denominator: f64,
    pub denominator_unit: Unit,
}

impl ConversionFactor {
    pub fn new(numerator: f64, numerator_unit: Unit, denominator: f64, denominator_unit: Unit) -> Self {
        Self {
            numerator,
            numerator_unit,
            denominator,
            denominator_unit,
        }
    }

    /// The factor turning `from` into `to` with whole-number-friendly sides.
    pub fn between(from: Unit, to: Unit) -> Result<Self, UnitError> {
        let ratio = convert(1.0, from, to)?;
        Ok(if ratio >= 1.0 {
            Self::new(ratio, to, 1.0, from)
        } else {
            Self::new(1.0, to, 1.0 / ratio, from)
        })
    }

    pub fn flipped(self) -> Self {
        Self::new(
            self.denominator,
            self.denominator_unit,
            self.numerator,
            self.numerator_unit,
        )
    }

    /// Whether both sides describe the same physical quantity.
    pub fn is_valid(&self) -> bool {
        match convert(self.numerator, self.numerator_unit, self.denominator_unit) {
            Ok(converted) => answer_matches(converted, self.denominator, 1e-9),
            Err(_) => false,
        }
    }
}

impl fmt::Display for ConversionFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {} / {} {})",
            self.numerator, self.numerator_unit, self.denominator, self.denominator_unit
        )
    }
}

/// Multiplies `value` through a chain of factors, cancelling units as it goes.
pub fn apply_chain(
    value: f64,
    unit: Unit,
    factors: &[ConversionFactor],
) -> Result<(f64, Unit), UnitError> {
    factors
        .iter()
        .enumerate()
        .try_fold((value, unit), |(value, unit), (step, factor)| {
            if factor.denominator_unit != unit {
                return Err(UnitError::UnitDoesNotCancel {
                    step,
                    expected: factor.denominator_unit,
                    found: unit,
                });
            }
            Ok((
                value * factor.numerator / factor.denominator,
                factor.numerator_unit,
            ))
        })
}

/// Relative comparison used to accept numeric answers.
pub fn answer_matches(answer: f64, expected: f64, relative_tolerance: f64) -> bool {
    if !answer.is_finite() {
        return false;
    }
    if expected == 0.0 {
        return answer.abs() <= relative_tolerance;
    }
    ((answer - expected) / expected).abs() <= relative_tolerance
}

/// Counts significant figures in a number as the learner typed it.
///
/// Trailing zeros count only when a decimal point is present. Returns `None`
/// for input that is not a plain decimal number.
pub fn significant_figures(input: &str) -> Option<usize> {
    let trimmed = input.trim().trim_start_matches(['+', '-']);
    let mantissa = match trimmed.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => {
            exponent.parse::<i32>().ok()?;
            mantissa
        }
        None => trimmed,
    };

    if mantissa.is_empty()
        || mantissa.chars().filter(|c| *c == '.').count() > 1
        || !mantissa.chars().all(|c| c.is_ascii_digit() || c == '.')
        || !mantissa.chars().any(|c| c.is_ascii_digit())
    {
        return None;
    }

    let has_point = mantissa.contains('.');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let significant = digits.trim_start_matches('0');

    if significant.is_empty() {
        // "0", "0.00": the zeros after the point are significant.
        let after_point = mantissa.split_once('.').map(|(_, right)| right.len()).unwrap_or(0);
        return Some(after_point.max(1));
    }

    if has_point {
        Some(significant.len())
    } else {
        Some(significant.trim_end_matches('0').len())
    }
}
