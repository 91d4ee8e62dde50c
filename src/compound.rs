use std::fmt;

/// Naming family a compound belongs to; each follows its own naming rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundKind {
    /// Metal cation with a nonmetal or polyatomic anion.
    Ionic,
    /// Two nonmetals, named with Greek prefixes.
    Molecular,
    Acid,
}

/// A compound used in the nomenclature matching game.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Compound {
    /// Systematic English name.
    pub name: String,
    /// Common or trivial name if one exists.
    #[serde(default)]
    pub common_name: Option<String>,
    /// Icelandic name shown alongside the English one.
    #[serde(default)]
    pub local_name: Option<String>,
    pub formula: String,
    pub kind: CompoundKind,
    /// Free-form hint shown after a wrong answer.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Compound {
    /// Returns an English display label that prefers the systematic name
    /// and appends the common name in parentheses when available and
    /// distinct.
    pub fn english_label(&self) -> String {
        match &self.common_name {
            Some(common) if common != &self.name => format!("{} ({})", self.name, common),
            _ => self.name.clone(),
        }
    }

    pub fn display_name(&self) -> String {
        let mut parts = vec![self.english_label()];

        if let Some(local) = &self.local_name {
            parts.push(format!("/ {}", local));
        }

        parts.join(" ")
    }

    pub fn hint(&self) -> String {
        match &self.notes {
            Some(notes) => notes.clone(),
            None => match self.kind {
                CompoundKind::Ionic => "Name the cation first, then the anion.".to_string(),
                CompoundKind::Molecular => {
                    "Use Greek prefixes for the number of each atom.".to_string()
                }
                CompoundKind::Acid => "Acids are named after their anion.".to_string(),
            },
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name(), self.formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt() -> Compound {
        Compound {
            name: "sodium chloride".to_string(),
            common_name: Some("table salt".to_string()),
            local_name: Some("natríumklóríð".to_string()),
            formula: "NaCl".to_string(),
            kind: CompoundKind::Ionic,
            notes: None,
        }
    }

    #[test]
    fn english_label_appends_common_name() {
        assert_eq!(salt().english_label(), "sodium chloride (table salt)");
    }

    #[test]
    fn english_label_avoids_duplicate_common_name() {
        let compound = Compound {
            common_name: Some("water".to_string()),
            name: "water".to_string(),
            local_name: None,
            formula: "H2O".to_string(),
            kind: CompoundKind::Molecular,
            notes: None,
        };

        assert_eq!(compound.english_label(), "water");
    }

    #[test]
    fn display_name_includes_local_name() {
        assert_eq!(
            salt().display_name(),
            "sodium chloride (table salt) / natríumklóríð"
        );
    }

    #[test]
    fn display_trait_includes_name_and_formula() {
        let formatted = format!("{}", salt());

        assert!(formatted.contains("sodium chloride"));
        assert!(formatted.ends_with(": NaCl"));
    }

    #[test]
    fn hint_falls_back_to_kind_rule() {
        assert_eq!(salt().hint(), "Name the cation first, then the anion.");

        let mut annotated = salt();
        annotated.notes = Some("Chloride is the anion of Cl".to_string());
        assert_eq!(annotated.hint(), "Chloride is the anion of Cl");
    }

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{
            "name": "carbon dioxide",
            "formula": "CO2",
            "kind": "molecular"
        }"#;

        let parsed: Compound = serde_json::from_str(json).expect("compound should fill defaults");

        assert!(parsed.common_name.is_none());
        assert!(parsed.local_name.is_none());
        assert!(parsed.notes.is_none());
        assert_eq!(parsed.kind, CompoundKind::Molecular);
    }
}
