//! Gibbs free energy and spontaneity predictions.
//!
//! Enthalpy is in kJ/mol, entropy in J/(mol·K) and temperature in kelvin,
//! matching how the values appear in textbook tables.

/// |ΔG| below this many kJ/mol is reported as equilibrium.
pub const EQUILIBRIUM_BAND: f64 = 0.5;

/// ΔG = ΔH − TΔS, in kJ/mol.
pub fn gibbs_free_energy(delta_h: f64, delta_s: f64, temperature: f64) -> f64 {
    delta_h - temperature * delta_s / 1000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Spontaneity {
    Spontaneous,
    Equilibrium,
    NonSpontaneous,
}

impl Spontaneity {
    pub fn from_delta_g(delta_g: f64) -> Self {
        if delta_g.abs() < EQUILIBRIUM_BAND {
            Self::Equilibrium
        } else if delta_g < 0.0 {
            Self::Spontaneous
        } else {
            Self::NonSpontaneous
        }
    }

    pub fn predict(delta_h: f64, delta_s: f64, temperature: f64) -> Self {
        Self::from_delta_g(gibbs_free_energy(delta_h, delta_s, temperature))
    }
}

/// The four sign combinations of ΔH and ΔS.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum ThermoCase {
    /// ΔH < 0, ΔS > 0.
    AlwaysSpontaneous,
    /// ΔH > 0, ΔS < 0.
    NeverSpontaneous,
    /// ΔH < 0, ΔS < 0: spontaneous below the crossover temperature.
    SpontaneousBelow { crossover: f64 },
    /// ΔH > 0, ΔS > 0: spontaneous above the crossover temperature.
    SpontaneousAbove { crossover: f64 },
}

impl ThermoCase {
    /// Classifies a reaction by its signs. Zero counts with the favourable side.
    pub fn classify(delta_h: f64, delta_s: f64) -> Self {
        let favourable_h = delta_h <= 0.0;
        let favourable_s = delta_s >= 0.0;

        match (favourable_h, favourable_s) {
            (true, true) => Self::AlwaysSpontaneous,
            (false, false) => Self::NeverSpontaneous,
            (true, false) => Self::SpontaneousBelow {
                crossover: crossover_temperature(delta_h, delta_s),
            },
            (false, true) => Self::SpontaneousAbove {
                crossover: crossover_temperature(delta_h, delta_s),
            },
        }
    }
}

impl ThermoCase {
    /// Answer texts in the order the predictor lists them.
    pub const DESCRIPTIONS: [&'static str; 4] = [
        "Spontaneous at every temperature",
        "Never spontaneous",
        "Spontaneous below a crossover temperature",
        "Spontaneous above a crossover temperature",
    ];

    pub fn description_index(&self) -> usize {
        match self {
            Self::AlwaysSpontaneous => 0,
            Self::NeverSpontaneous => 1,
            Self::SpontaneousBelow { .. } => 2,
            Self::SpontaneousAbove { .. } => 3,
        }
    }

    pub fn description(&self) -> &'static str {
        Self::DESCRIPTIONS[self.description_index()]
    }

    pub fn crossover(&self) -> Option<f64> {
        match *self {
            Self::SpontaneousBelow { crossover } | Self::SpontaneousAbove { crossover } => {
                Some(crossover)
            }
            Self::AlwaysSpontaneous | Self::NeverSpontaneous => None,
        }
    }
}

/// Temperature in kelvin at which ΔG changes sign.
pub fn crossover_temperature(delta_h: f64, delta_s: f64) -> f64 {
    1000.0 * delta_h / delta_s
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Solid,
    Liquid,
    Aqueous,
    Gas,
}

impl Phase {
    fn disorder(self) -> u8 {
        match self {
            Self::Solid => 0,
            Self::Liquid | Self::Aqueous => 1,
            Self::Gas => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyDirection {
    Increases,
    Decreases,
    Unclear,
}

impl EntropyDirection {
    pub const ALL: [Self; 3] = [Self::Increases, Self::Decreases, Self::Unclear];

    pub fn index(self) -> usize {
        match self {
            Self::Increases => 0,
            Self::Decreases => 1,
            Self::Unclear => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Increases => "Entropy increases",
            Self::Decreases => "Entropy decreases",
            Self::Unclear => "Cannot tell from the equation",
        }
    }

    /// Sign of ΔS from the change in moles of gas across the equation.
    pub fn from_gas_moles(reactant_gas: u32, product_gas: u32) -> Self {
        match product_gas.cmp(&reactant_gas) {
            std::cmp::Ordering::Greater => Self::Increases,
            std::cmp::Ordering::Less => Self::Decreases,
            std::cmp::Ordering::Equal => Self::Unclear,
        }
    }

    pub fn from_phase_change(from: Phase, to: Phase) -> Self {
        match to.disorder().cmp(&from.disorder()) {
            std::cmp::Ordering::Greater => Self::Increases,
            std::cmp::Ordering::Less => Self::Decreases,
            std::cmp::Ordering::Equal => Self::Unclear,
        }
    }
}

/// What the equation shows about the sign of ΔS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntropyCue {
    GasMoles { reactants: u32, products: u32 },
    PhaseChange { from: Phase, to: Phase },
}

/// Tabulated reaction used by the thermodynamics predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoData {
    pub equation: &'static str,
    /// kJ/mol
    pub delta_h: f64,
    /// J/(mol·K)
    pub delta_s: f64,
    pub entropy_cue: EntropyCue,
}

impl ThermoData {
    pub fn case(&self) -> ThermoCase {
        ThermoCase::classify(self.delta_h, self.delta_s)
    }

    pub fn entropy_direction(&self) -> EntropyDirection {
        match self.entropy_cue {
            EntropyCue::GasMoles {
                reactants,
                products,
            } => EntropyDirection::from_gas_moles(reactants, products),
            EntropyCue::PhaseChange { from, to } => EntropyDirection::from_phase_change(from, to),
        }
    }
}
