use std::collections::BTreeMap;

use crate::reaction::{ReactantSlot, Reaction};

/// An available quantity of a reactant, as entered on a slider or number field.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Quantity {
    Molecules { count: u64 },
    Moles { moles: f64 },
    Grams { grams: f64, molar_mass: f64 },
}

impl Quantity {
    /// Amount in the unit the calculator compares: molecules or moles.
    pub fn amount(&self) -> f64 {
        match *self {
            Self::Molecules { count } => count as f64,
            Self::Moles { moles } => moles,
            Self::Grams { grams, molar_mass } => {
                if molar_mass > 0.0 {
                    grams / molar_mass
                } else {
                    0.0
                }
            }
        }
    }
}

/// Outcome of running a reaction to completion with the given reactant amounts.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CalculationResult {
    pub limiting: ReactantSlot,
    pub limiting_formula: String,
    /// Whole number of times the balanced reaction can run.
    pub times_reaction_runs: u64,
    /// Product formula to amount formed.
    pub products_formed: BTreeMap<String, u64>,
    pub excess: ReactantSlot,
    pub excess_formula: String,
    /// Amount of the non-limiting reactant left over.
    pub excess_remaining: f64,
    /// Amount of the limiting reactant left over after flooring the run count.
    pub limiting_leftover: f64,
}

impl CalculationResult {
    pub fn product_amount(&self, formula: &str) -> u64 {
        self.products_formed.get(formula).copied().unwrap_or(0)
    }
}

fn sanitize(amount: f64) -> f64 {
    // f64::max drops NaN in favour of the other operand.
    amount.max(0.0)
}

/// Unfloored number of times the reaction could run on each reactant alone.
pub fn ratios(reaction: &Reaction, amount1: f64, amount2: f64) -> [f64; 2] {
    [
        sanitize(amount1) / f64::from(reaction.reactants[0].coefficient),
        sanitize(amount2) / f64::from(reaction.reactants[1].coefficient),
    ]
}

/// Determines the limiting reactant and the resulting product and excess amounts.
///
/// The reactant with the smaller coefficient-normalized amount limits the
/// reaction. On an exact tie the first reactant is reported as limiting; both
/// reactants are used up in that case, so only the label is affected.
///
/// Negative or NaN amounts are treated as zero.
pub fn calculate(reaction: &Reaction, amount1: f64, amount2: f64) -> CalculationResult {
    let amounts = [sanitize(amount1), sanitize(amount2)];
    let [from_first, from_second] = ratios(reaction, amounts[0], amounts[1]);

    let limiting = if from_first <= from_second {
        ReactantSlot::First
    } else {
        ReactantSlot::Second
    };
    let excess = limiting.other();

    let times = from_first.min(from_second).floor();
    // Float to int casts saturate, so huge amounts clamp at u64::MAX.
    let times_reaction_runs = times as u64;

    let products_formed = reaction
        .products
        .iter()
        .map(|product| {
            (
                product.formula.clone(),
                times_reaction_runs.saturating_mul(u64::from(product.coefficient)),
            )
        })
        .collect();

    let consumed = |slot: ReactantSlot| times * f64::from(reaction.reactant(slot).coefficient);
    let excess_remaining = (amounts[excess.index()] - consumed(excess)).max(0.0);
    let limiting_leftover = (amounts[limiting.index()] - consumed(limiting)).max(0.0);

    CalculationResult {
        limiting,
        limiting_formula: reaction.reactant(limiting).formula.clone(),
        times_reaction_runs,
        products_formed,
        excess,
        excess_formula: reaction.reactant(excess).formula.clone(),
        excess_remaining,
        limiting_leftover,
    }
}

/// Same as [`calculate`], converting masses and counts first.
pub fn calculate_quantities(
    reaction: &Reaction,
    first: Quantity,
    second: Quantity,
) -> CalculationResult {
    calculate(reaction, first.amount(), second.amount())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::{Difficulty, Species};

    fn water() -> Reaction {
        Reaction {
            equation: "2H₂ + O₂ → 2H₂O".to_string(),
            reactants: [Species::new("H₂", 2), Species::new("O₂", 1)],
            products: vec![Species::new("H₂O", 2)],
            difficulty: Difficulty::Easy,
        }
    }

    fn ammonia() -> Reaction {
        Reaction {
            equation: "N₂ + 3H₂ → 2NH₃".to_string(),
            reactants: [Species::new("N₂", 1), Species::new("H₂", 3)],
            products: vec![Species::new("NH₃", 2)],
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn oxygen_limits_water_synthesis() {
        let result = calculate(&water(), 10.0, 3.0);

        assert_eq!(result.limiting, ReactantSlot::Second);
        assert_eq!(result.limiting_formula, "O₂");
        assert_eq!(result.times_reaction_runs, 3);
        assert_eq!(result.product_amount("H₂O"), 6);
        assert_eq!(result.excess_formula, "H₂");
        assert_eq!(result.excess_remaining, 4.0);
        assert_eq!(result.limiting_leftover, 0.0);
    }

    #[test]
    fn hydrogen_limits_ammonia_synthesis() {
        let result = calculate(&ammonia(), 4.0, 9.0);

        assert_eq!(result.limiting_formula, "H₂");
        assert_eq!(result.times_reaction_runs, 3);
        assert_eq!(result.product_amount("NH₃"), 6);
        assert_eq!(result.excess_formula, "N₂");
        assert_eq!(result.excess_remaining, 1.0);
    }

    #[test]
    fn tie_reports_first_reactant_as_limiting() {
        let result = calculate(&water(), 6.0, 3.0);

        assert_eq!(result.limiting, ReactantSlot::First);
        assert_eq!(result.limiting_formula, "H₂");
        assert_eq!(result.excess, ReactantSlot::Second);
        assert_eq!(result.excess_remaining, 0.0);
        assert_eq!(result.times_reaction_runs, 3);
    }

    #[test]
    fn coefficient_normalization_beats_raw_amounts() {
        // More H₂ molecules than N₂, yet H₂ still runs out first.
        let result = calculate(&ammonia(), 2.0, 5.0);

        assert_eq!(result.limiting_formula, "H₂");
        assert_eq!(result.times_reaction_runs, 1);
        assert_eq!(result.limiting_leftover, 2.0);
        assert_eq!(result.excess_remaining, 1.0);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let result = calculate(&water(), 1e30, 1e30);

        assert_eq!(result.limiting, ReactantSlot::First);
        assert_eq!(result.times_reaction_runs, u64::MAX);
        assert_eq!(result.product_amount("H₂O"), u64::MAX);
        assert!(result.excess_remaining >= 0.0);

        let counted = calculate_quantities(
            &ammonia(),
            Quantity::Molecules { count: u64::MAX },
            Quantity::Molecules { count: u64::MAX },
        );
        assert_eq!(counted.limiting_formula, "H₂");
        assert!(counted.product_amount("NH₃") >= counted.times_reaction_runs);
    }

    #[test]
    fn zero_amount_runs_nothing() {
        let result = calculate(&water(), 0.0, 5.0);

        assert_eq!(result.limiting, ReactantSlot::First);
        assert_eq!(result.times_reaction_runs, 0);
        assert_eq!(result.product_amount("H₂O"), 0);
        assert_eq!(result.excess_remaining, 5.0);
    }

    #[test]
    fn negative_and_nan_amounts_are_clamped() {
        let result = calculate(&water(), -4.0, f64::NAN);

        assert_eq!(result.times_reaction_runs, 0);
        assert_eq!(result.excess_remaining, 0.0);
        assert_eq!(result.limiting_leftover, 0.0);
    }

    #[test]
    fn grams_are_converted_to_moles() {
        let result = calculate_quantities(
            &water(),
            Quantity::Grams {
                grams: 20.16,
                molar_mass: 2.016,
            },
            Quantity::Moles { moles: 2.0 },
        );

        assert_eq!(result.limiting_formula, "O₂");
        assert_eq!(result.times_reaction_runs, 2);
        assert!((result.excess_remaining - 6.0).abs() < 1e-9);
    }

    #[test]
    fn zero_molar_mass_counts_as_nothing() {
        let quantity = Quantity::Grams {
            grams: 5.0,
            molar_mass: 0.0,
        };
        assert_eq!(quantity.amount(), 0.0);
    }

    #[test]
    fn ratios_are_unfloored() {
        assert_eq!(ratios(&water(), 5.0, 3.0), [2.5, 3.0]);
    }
}
