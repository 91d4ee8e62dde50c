//! Naming rules for binary molecular compounds.

const PREFIXES: [&str; 10] = [
    "mono", "di", "tri", "tetra", "penta", "hexa", "hepta", "octa", "nona", "deca",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("atom count {count} is outside 1..=10")]
    CountOutOfRange { count: u32 },
}

/// Greek prefix for an atom count between one and ten.
pub fn prefix(count: u32) -> Result<&'static str, NamingError> {
    match count {
        1..=10 => Ok(PREFIXES[count as usize - 1]),
        _ => Err(NamingError::CountOutOfRange { count }),
    }
}

fn join_prefix(prefix: &str, root: &str) -> String {
    // "tetra" + "oxide" -> "tetroxide", "mono" + "oxide" -> "monoxide"
    let starts_with_vowel = root.starts_with(['a', 'o']);
    if starts_with_vowel && (prefix.ends_with('a') || prefix.ends_with('o')) {
        format!("{}{}", &prefix[..prefix.len() - 1], root)
    } else {
        format!("{}{}", prefix, root)
    }
}

/// Builds the name of a binary molecular compound such as `dinitrogen tetroxide`.
///
/// `first` is the element name of the less electronegative atom and
/// `second_root` the `-ide` form of the other, e.g. `oxide`. The first element
/// never takes `mono`.
pub fn binary_molecular_name(
    first: &str,
    first_count: u32,
    second_root: &str,
    second_count: u32,
) -> Result<String, NamingError> {
    let first_part = if first_count == 1 {
        prefix(first_count)?;
        first.to_string()
    } else {
        join_prefix(prefix(first_count)?, first)
    };
    let second_part = join_prefix(prefix(second_count)?, second_root);

    Ok(format!("{} {}", first_part, second_part))
}

/// A binary molecular compound, e.g. N₂O₄.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryMolecule {
    /// Element name of the first atom, e.g. `nitrogen`.
    pub first: &'static str,
    pub first_symbol: &'static str,
    pub first_count: u32,
    /// `-ide` root of the second atom, e.g. `oxide`.
    pub second_root: &'static str,
    pub second_symbol: &'static str,
    pub second_count: u32,
}

impl BinaryMolecule {
    pub fn name(&self) -> Result<String, NamingError> {
        binary_molecular_name(self.first, self.first_count, self.second_root, self.second_count)
    }

    /// Formula with Unicode subscripts, e.g. `N₂O₄`.
    pub fn formula(&self) -> String {
        format!(
            "{}{}{}{}",
            self.first_symbol,
            subscript(self.first_count),
            self.second_symbol,
            subscript(self.second_count)
        )
    }
}

fn subscript(count: u32) -> String {
    if count == 1 {
        return String::new();
    }
    count
        .to_string()
        .chars()
        .filter_map(|digit| digit.to_digit(10))
        .filter_map(|digit| char::from_u32('₀' as u32 + digit))
        .collect()
}
