//! Formula parsing and molar masses for the mass-based limiting reactant levels.

use std::collections::BTreeMap;

/// Standard atomic weights (g/mol) for the elements used by the games.
const ATOMIC_WEIGHTS: &[(&str, f64)] = &[
    ("H", 1.008),
    ("He", 4.0026),
    ("Li", 6.94),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.180),
    ("Na", 22.990),
    ("Mg", 24.305),
    ("Al", 26.982),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.06),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.098),
    ("Ca", 40.078),
    ("Cr", 51.996),
    ("Mn", 54.938),
    ("Fe", 55.845),
    ("Co", 58.933),
    ("Ni", 58.693),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Br", 79.904),
    ("Ag", 107.87),
    ("Sn", 118.71),
    ("I", 126.90),
    ("Ba", 137.33),
    ("Pb", 207.2),
];

pub fn atomic_weight(symbol: &str) -> Option<f64> {
    ATOMIC_WEIGHTS
        .iter()
        .find(|(candidate, _)| *candidate == symbol)
        .map(|(_, weight)| *weight)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("unknown element symbol {symbol}")]
    UnknownElement { symbol: String },
    #[error("unexpected character {found:?} at position {position}")]
    UnexpectedCharacter { found: char, position: usize },
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("atom count near position {position} is too large")]
    CountTooLarge { position: usize },
}

fn subscript_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '₀'..='₉' => Some(c as u32 - '₀' as u32),
        _ => None,
    }
}

fn read_count(chars: &[char], position: &mut usize) -> Result<u32, FormulaError> {
    let start = *position;
    let mut count = None;
    while let Some(digit) = chars.get(*position).copied().and_then(subscript_digit) {
        count = Some(
            count
                .unwrap_or(0u32)
                .checked_mul(10)
                .and_then(|value| value.checked_add(digit))
                .ok_or(FormulaError::CountTooLarge { position: start })?,
        );
        *position += 1;
    }
    Ok(count.unwrap_or(1))
}

fn add_atoms(
    into: &mut BTreeMap<String, u32>,
    symbol: String,
    count: u32,
    position: usize,
) -> Result<(), FormulaError> {
    let total = into.entry(symbol).or_insert(0);
    *total = total
        .checked_add(count)
        .ok_or(FormulaError::CountTooLarge { position })?;
    Ok(())
}

fn merge(
    into: &mut BTreeMap<String, u32>,
    from: BTreeMap<String, u32>,
    factor: u32,
    position: usize,
) -> Result<(), FormulaError> {
    for (symbol, count) in from {
        let scaled = count
            .checked_mul(factor)
            .ok_or(FormulaError::CountTooLarge { position })?;
        add_atoms(into, symbol, scaled, position)?;
    }
    Ok(())
}

/// Parses a formula such as `Ca(OH)₂` into element counts.
///
/// Accepts ASCII or Unicode subscript digits and nested parentheses.
pub fn parse_formula(formula: &str) -> Result<BTreeMap<String, u32>, FormulaError> {
    let chars: Vec<char> = formula.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut stack: Vec<BTreeMap<String, u32>> = vec![BTreeMap::new()];
    let mut position = 0;

    while position < chars.len() {
        let c = chars[position];
        match c {
            '(' | '[' => {
                stack.push(BTreeMap::new());
                position += 1;
            }
            ')' | ']' => {
                position += 1;
                let group = stack.pop().ok_or(FormulaError::UnbalancedParentheses)?;
                let factor_position = position;
                let factor = read_count(&chars, &mut position)?;
                let parent = stack
                    .last_mut()
                    .ok_or(FormulaError::UnbalancedParentheses)?;
                merge(parent, group, factor, factor_position)?;
            }
            'A'..='Z' => {
                let mut symbol = c.to_string();
                position += 1;
                while let Some(next) = chars.get(position).filter(|next| next.is_ascii_lowercase()) {
                    symbol.push(*next);
                    position += 1;
                }
                if atomic_weight(&symbol).is_none() {
                    return Err(FormulaError::UnknownElement { symbol });
                }
                let count_position = position;
                let count = read_count(&chars, &mut position)?;
                let current = stack
                    .last_mut()
                    .ok_or(FormulaError::UnbalancedParentheses)?;
                add_atoms(current, symbol, count, count_position)?;
            }
            _ => {
                return Err(FormulaError::UnexpectedCharacter { found: c, position });
            }
        }
    }

    if stack.len() != 1 {
        return Err(FormulaError::UnbalancedParentheses);
    }

    stack.pop().ok_or(FormulaError::UnbalancedParentheses)
}

/// Molar mass in g/mol.
pub fn molar_mass(formula: &str) -> Result<f64, FormulaError> {
    let counts = parse_formula(formula)?;
    Ok(counts
        .iter()
        .map(|(symbol, count)| atomic_weight(symbol).unwrap_or(0.0) * f64::from(*count))
        .sum())
}

pub fn moles_from_grams(grams: f64, formula: &str) -> Result<f64, FormulaError> {
    Ok(grams / molar_mass(formula)?)
}
