use std::fmt;

/// Difficulty tag attached to every reaction in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Identifies one of the two reactants of a [`Reaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactantSlot {
    First,
    Second,
}

impl ReactantSlot {
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A reactant or product together with its stoichiometric coefficient.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Species {
    /// Chemical formula, e.g. `H2O` or `H₂O`.
    pub formula: String,
    /// Coefficient from the balanced equation. Must be positive.
    pub coefficient: u32,
    /// Colour used when the species is drawn as molecules.
    #[serde(default)]
    pub color: Option<String>,
}

impl Species {
    pub fn new(formula: impl Into<String>, coefficient: u32) -> Self {
        Self {
            formula: formula.into(),
            coefficient,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Formula prefixed by its coefficient, omitting a coefficient of one.
    pub fn term(&self) -> String {
        if self.coefficient == 1 {
            self.formula.clone()
        } else {
            format!("{}{}", self.coefficient, self.formula)
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReactionError {
    #[error("species {formula} in {equation} has a zero coefficient")]
    ZeroCoefficient { equation: String, formula: String },
    #[error("reaction {equation} has no products")]
    NoProducts { equation: String },
}

/// A balanced reaction between exactly two reactants.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Reaction {
    /// Equation as shown to the learner.
    pub equation: String,
    pub reactants: [Species; 2],
    pub products: Vec<Species>,
    pub difficulty: Difficulty,
}

impl Reaction {
    pub fn reactant(&self, slot: ReactantSlot) -> &Species {
        &self.reactants[slot.index()]
    }

    pub fn product(&self, formula: &str) -> Option<&Species> {
        self.products
            .iter()
            .find(|product| product.formula == formula)
    }

    /// Rebuilds the equation text from the coefficients.
    pub fn balanced_equation(&self) -> String {
        let left: Vec<String> = self.reactants.iter().map(Species::term).collect();
        let right: Vec<String> = self.products.iter().map(Species::term).collect();
        format!("{} → {}", left.join(" + "), right.join(" + "))
    }

    pub fn validate(&self) -> Result<(), ReactionError> {
        if self.products.is_empty() {
            return Err(ReactionError::NoProducts {
                equation: self.equation.clone(),
            });
        }

        if let Some(species) = self
            .reactants
            .iter()
            .chain(self.products.iter())
            .find(|species| species.coefficient == 0)
        {
            return Err(ReactionError::ZeroCoefficient {
                equation: self.equation.clone(),
                formula: species.formula.clone(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.equation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Reaction {
        Reaction {
            equation: "2H₂ + O₂ → 2H₂O".to_string(),
            reactants: [Species::new("H₂", 2), Species::new("O₂", 1)],
            products: vec![Species::new("H₂O", 2)],
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn balanced_equation_omits_unit_coefficients() {
        assert_eq!(water().balanced_equation(), "2H₂ + O₂ → 2H₂O");
    }

    #[test]
    fn reactant_lookup_by_slot() {
        let reaction = water();
        assert_eq!(reaction.reactant(ReactantSlot::First).formula, "H₂");
        assert_eq!(reaction.reactant(ReactantSlot::Second).formula, "O₂");
        assert_eq!(ReactantSlot::First.other(), ReactantSlot::Second);
    }

    #[test]
    fn validate_rejects_zero_coefficient() {
        let mut reaction = water();
        reaction.products[0].coefficient = 0;

        assert_eq!(
            reaction.validate(),
            Err(ReactionError::ZeroCoefficient {
                equation: "2H₂ + O₂ → 2H₂O".to_string(),
                formula: "H₂O".to_string(),
            })
        );
    }

    #[test]
    fn validate_rejects_missing_products() {
        let mut reaction = water();
        reaction.products.clear();

        assert!(matches!(
            reaction.validate(),
            Err(ReactionError::NoProducts { .. })
        ));
    }

    #[test]
    fn parses_reaction_with_optional_colors() {
        let json = r##"{
            "equation": "N₂ + 3H₂ → 2NH₃",
            "reactants": [
                { "formula": "N₂", "coefficient": 1, "color": "#3b82f6" },
                { "formula": "H₂", "coefficient": 3 }
            ],
            "products": [{ "formula": "NH₃", "coefficient": 2 }],
            "difficulty": "medium"
        }"##;

        let parsed: Reaction = serde_json::from_str(json).expect("reaction should parse");

        assert_eq!(parsed.difficulty, Difficulty::Medium);
        assert_eq!(parsed.reactants[0].color.as_deref(), Some("#3b82f6"));
        assert!(parsed.reactants[1].color.is_none());
        assert_eq!(parsed.product("NH₃").map(|p| p.coefficient), Some(2));
        assert!(parsed.validate().is_ok());
    }
}
