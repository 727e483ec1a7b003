//! Burden categories - how much evidence a fact needs to be considered covered

/// Burden-of-proof class of a fact
///
/// Each class carries its own evidentiary-sufficiency target, the number of
/// evidence links at which the evidence half of the coverage score saturates:
/// - Ordinary: the proponent carries the usual burden (3 pieces)
/// - Shifted: the burden lies mostly with the opposing party (2 pieces)
/// - Heightened: a reinforced standard applies (4 pieces)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BurdenCategory {
    /// Standard burden on the party asserting the fact
    #[default]
    Ordinary,

    /// Burden shifted to the opposing party
    Shifted,

    /// Reinforced standard of proof
    Heightened,
}

impl BurdenCategory {
    /// Number of evidence links that fully satisfy this burden
    pub fn target(&self) -> u32 {
        match self {
            BurdenCategory::Ordinary => 3,
            BurdenCategory::Shifted => 2,
            BurdenCategory::Heightened => 4,
        }
    }

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            BurdenCategory::Ordinary => "ordinary",
            BurdenCategory::Shifted => "shifted",
            BurdenCategory::Heightened => "heightened",
        }
    }

    /// Parse a category from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ordinary" => Some(BurdenCategory::Ordinary),
            "shifted" => Some(BurdenCategory::Shifted),
            "heightened" => Some(BurdenCategory::Heightened),
            _ => None,
        }
    }
}

impl std::str::FromStr for BurdenCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid burden category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burden_targets() {
        assert_eq!(BurdenCategory::Ordinary.target(), 3);
        assert_eq!(BurdenCategory::Shifted.target(), 2);
        assert_eq!(BurdenCategory::Heightened.target(), 4);
    }

    #[test]
    fn test_burden_parse() {
        assert_eq!(BurdenCategory::parse("SHIFTED"), Some(BurdenCategory::Shifted));
        assert_eq!("heightened".parse::<BurdenCategory>(), Ok(BurdenCategory::Heightened));
        assert!(BurdenCategory::parse("beyond-doubt").is_none());
    }
}
