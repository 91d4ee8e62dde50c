use crate::compound::{Compound, CompoundKind};
use crate::nomenclature::BinaryMolecule;
use crate::reaction::{Difficulty, Reaction, Species};
use crate::thermo::{EntropyCue, Phase, ThermoData};
use crate::{Catalog, CatalogEntry};

fn reaction(
    equation: &str,
    reactants: [(&str, u32, &str); 2],
    products: &[(&str, u32)],
    difficulty: Difficulty,
) -> Reaction {
    let [(f1, c1, color1), (f2, c2, color2)] = reactants;
    Reaction {
        equation: equation.to_string(),
        reactants: [
            Species::new(f1, c1).with_color(color1),
            Species::new(f2, c2).with_color(color2),
        ],
        products: products
            .iter()
            .map(|(formula, coefficient)| Species::new(*formula, *coefficient))
            .collect(),
        difficulty,
    }
}

fn builtin_entries() -> Vec<(Reaction, Vec<String>)> {
    vec![
        (
            reaction(
                "2H₂ + O₂ → 2H₂O",
                [("H₂", 2, "#e5e7eb"), ("O₂", 1, "#ef4444")],
                &[("H₂O", 2)],
                Difficulty::Easy,
            ),
            vec!["Synthesis".to_string()],
        ),
        (
            reaction(
                "H₂ + Cl₂ → 2HCl",
                [("H₂", 1, "#e5e7eb"), ("Cl₂", 1, "#22c55e")],
                &[("HCl", 2)],
                Difficulty::Easy,
            ),
            vec!["Synthesis".to_string()],
        ),
        (
            reaction(
                "C + O₂ → CO₂",
                [("C", 1, "#374151"), ("O₂", 1, "#ef4444")],
                &[("CO₂", 1)],
                Difficulty::Easy,
            ),
            vec!["Combustion".to_string()],
        ),
        (
            reaction(
                "N₂ + 3H₂ → 2NH₃",
                [("N₂", 1, "#3b82f6"), ("H₂", 3, "#e5e7eb")],
                &[("NH₃", 2)],
                Difficulty::Medium,
            ),
            vec!["Synthesis".to_string(), "Industrial".to_string()],
        ),
        (
            reaction(
                "2Na + Cl₂ → 2NaCl",
                [("Na", 2, "#a855f7"), ("Cl₂", 1, "#22c55e")],
                &[("NaCl", 2)],
                Difficulty::Medium,
            ),
            vec!["Synthesis".to_string()],
        ),
        (
            reaction(
                "CH₄ + 2O₂ → CO₂ + 2H₂O",
                [("CH₄", 1, "#374151"), ("O₂", 2, "#ef4444")],
                &[("CO₂", 1), ("H₂O", 2)],
                Difficulty::Medium,
            ),
            vec!["Combustion".to_string()],
        ),
        (
            reaction(
                "2SO₂ + O₂ → 2SO₃",
                [("SO₂", 2, "#eab308"), ("O₂", 1, "#ef4444")],
                &[("SO₃", 2)],
                Difficulty::Hard,
            ),
            vec!["Synthesis".to_string(), "Industrial".to_string()],
        ),
        (
            reaction(
                "C₃H₈ + 5O₂ → 3CO₂ + 4H₂O",
                [("C₃H₈", 1, "#374151"), ("O₂", 5, "#ef4444")],
                &[("CO₂", 3), ("H₂O", 4)],
                Difficulty::Hard,
            ),
            vec!["Combustion".to_string()],
        ),
        (
            reaction(
                "4Fe + 3O₂ → 2Fe₂O₃",
                [("Fe", 4, "#b45309"), ("O₂", 3, "#ef4444")],
                &[("Fe₂O₃", 2)],
                Difficulty::Hard,
            ),
            vec!["Synthesis".to_string(), "Corrosion".to_string()],
        ),
    ]
}

/// Reaction table shipped with the limiting reactant game.
pub fn builtin_catalog() -> Catalog {
    Catalog::new(
        builtin_entries()
            .into_iter()
            .map(|(reaction, categories)| CatalogEntry {
                reaction,
                categories,
            })
            .collect(),
    )
}

fn compound(
    name: &str,
    common_name: Option<&str>,
    local_name: &str,
    formula: &str,
    kind: CompoundKind,
) -> Compound {
    Compound {
        name: name.to_string(),
        common_name: common_name.map(str::to_string),
        local_name: Some(local_name.to_string()),
        formula: formula.to_string(),
        kind,
        notes: None,
    }
}

/// Compounds used by the nomenclature matching game.
pub fn builtin_compounds() -> Vec<Compound> {
    vec![
        compound("sodium chloride", Some("table salt"), "natríumklóríð", "NaCl", CompoundKind::Ionic),
        compound("calcium carbonate", Some("limestone"), "kalsíumkarbónat", "CaCO₃", CompoundKind::Ionic),
        compound("magnesium oxide", None, "magnesíumoxíð", "MgO", CompoundKind::Ionic),
        compound("potassium nitrate", Some("saltpetre"), "kalíumnítrat", "KNO₃", CompoundKind::Ionic),
        compound("iron(III) oxide", Some("rust"), "járn(III)oxíð", "Fe₂O₃", CompoundKind::Ionic),
        compound("carbon dioxide", None, "koltvíoxíð", "CO₂", CompoundKind::Molecular),
        compound("carbon monoxide", None, "koleinoxíð", "CO", CompoundKind::Molecular),
        compound("dinitrogen tetroxide", None, "tvíköfnunarefnisfjóroxíð", "N₂O₄", CompoundKind::Molecular),
        compound("sulfur hexafluoride", None, "brennisteinshexaflúoríð", "SF₆", CompoundKind::Molecular),
        compound("hydrochloric acid", None, "saltsýra", "HCl", CompoundKind::Acid),
        compound("sulfuric acid", None, "brennisteinssýra", "H₂SO₄", CompoundKind::Acid),
        compound("nitric acid", None, "saltpéturssýra", "HNO₃", CompoundKind::Acid),
    ]
}

/// Standard enthalpy (kJ/mol) and entropy (J/(mol·K)) changes at 298 K.
pub const THERMO_TABLE: &[ThermoData] = &[
    ThermoData {
        equation: "N₂ + 3H₂ → 2NH₃",
        delta_h: -92.2,
        delta_s: -198.7,
        entropy_cue: EntropyCue::GasMoles {
            reactants: 4,
            products: 2,
        },
    },
    ThermoData {
        equation: "CaCO₃ → CaO + CO₂",
        delta_h: 178.3,
        delta_s: 160.5,
        entropy_cue: EntropyCue::GasMoles {
            reactants: 0,
            products: 1,
        },
    },
    ThermoData {
        equation: "H₂O(s) → H₂O(l)",
        delta_h: 6.01,
        delta_s: 22.0,
        entropy_cue: EntropyCue::PhaseChange {
            from: Phase::Solid,
            to: Phase::Liquid,
        },
    },
    ThermoData {
        equation: "2H₂O₂ → 2H₂O + O₂",
        delta_h: -196.0,
        delta_s: 125.8,
        entropy_cue: EntropyCue::GasMoles {
            reactants: 0,
            products: 1,
        },
    },
    ThermoData {
        equation: "3O₂ → 2O₃",
        delta_h: 285.4,
        delta_s: -137.6,
        entropy_cue: EntropyCue::GasMoles {
            reactants: 3,
            products: 2,
        },
    },
    ThermoData {
        equation: "CH₄ + 2O₂ → CO₂ + 2H₂O(l)",
        delta_h: -890.4,
        delta_s: -242.8,
        entropy_cue: EntropyCue::GasMoles {
            reactants: 3,
            products: 1,
        },
    },
];

const fn molecule(
    first: &'static str,
    first_symbol: &'static str,
    first_count: u32,
    second_root: &'static str,
    second_symbol: &'static str,
    second_count: u32,
) -> BinaryMolecule {
    BinaryMolecule {
        first,
        first_symbol,
        first_count,
        second_root,
        second_symbol,
        second_count,
    }
}

/// Binary molecular compounds named with Greek prefixes.
pub const BINARY_MOLECULES: &[BinaryMolecule] = &[
    molecule("carbon", "C", 1, "oxide", "O", 1),
    molecule("carbon", "C", 1, "oxide", "O", 2),
    molecule("nitrogen", "N", 1, "oxide", "O", 2),
    molecule("nitrogen", "N", 2, "oxide", "O", 1),
    molecule("nitrogen", "N", 2, "oxide", "O", 4),
    molecule("nitrogen", "N", 2, "oxide", "O", 5),
    molecule("phosphorus", "P", 2, "oxide", "O", 5),
    molecule("phosphorus", "P", 1, "chloride", "Cl", 3),
    molecule("phosphorus", "P", 1, "chloride", "Cl", 5),
    molecule("sulfur", "S", 1, "oxide", "O", 3),
    molecule("sulfur", "S", 1, "fluoride", "F", 6),
    molecule("carbon", "C", 1, "sulfide", "S", 2),
    molecule("carbon", "C", 1, "chloride", "Cl", 4),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molar_mass::parse_formula;
    use crate::thermo::EntropyDirection;

    #[test]
    fn builtin_reactions_are_valid() {
        let catalog = builtin_catalog();
        for reaction in catalog.all_reactions() {
            assert!(reaction.validate().is_ok(), "{} is invalid", reaction);
            assert_eq!(reaction.balanced_equation(), reaction.equation);
        }
    }

    #[test]
    fn builtin_reactions_are_balanced() {
        for reaction in builtin_catalog().all_reactions() {
            let count = |species: &[Species]| {
                let mut atoms = std::collections::BTreeMap::new();
                for item in species {
                    let parsed = parse_formula(&item.formula).expect("builtin formulas parse");
                    for (symbol, n) in parsed {
                        *atoms.entry(symbol).or_insert(0) += n * item.coefficient;
                    }
                }
                atoms
            };

            assert_eq!(
                count(reaction.reactants.as_slice()),
                count(reaction.products.as_slice()),
                "{} is not balanced",
                reaction
            );
        }
    }

    #[test]
    fn every_difficulty_has_reactions() {
        let catalog = builtin_catalog();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert!(catalog.by_difficulty(difficulty).len() >= 3);
        }
    }

    #[test]
    fn compound_formulas_parse() {
        for compound in builtin_compounds() {
            assert!(
                parse_formula(&compound.formula).is_ok(),
                "{} does not parse",
                compound.formula
            );
        }
    }

    #[test]
    fn entropy_cues_agree_with_tabulated_entropy() {
        for row in THERMO_TABLE {
            let expected = if row.delta_s > 0.0 {
                EntropyDirection::Increases
            } else {
                EntropyDirection::Decreases
            };
            assert_eq!(row.entropy_direction(), expected, "{}", row.equation);
        }
    }

    #[test]
    fn binary_molecules_name_and_parse() {
        for molecule in BINARY_MOLECULES {
            let name = molecule.name().expect("counts are within the prefix table");
            let counts = parse_formula(&molecule.formula()).expect("formula parses");

            assert_eq!(counts.get(molecule.first_symbol), Some(&molecule.first_count), "{name}");
            assert_eq!(counts.get(molecule.second_symbol), Some(&molecule.second_count), "{name}");
        }
    }
}
