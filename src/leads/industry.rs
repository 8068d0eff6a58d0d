use serde::Serialize;
use std::fmt;

/// Rough industry bucket guessed from a business name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Industry {
    Dental,
    Healthcare,
    MentalHealth,
    Fitness,
    Beauty,
}

/// Keyword groups checked in order; the first hit wins
const KEYWORDS: &[(&[&str], Industry)] = &[
    (&["dental", "dentist"], Industry::Dental),
    (&["medical", "clinic", "health"], Industry::Healthcare),
    (&["therapy", "counseling", "mental"], Industry::MentalHealth),
    (&["fitness", "gym", "wellness"], Industry::Fitness),
    (&["beauty", "spa", "salon"], Industry::Beauty),
];

impl Industry {
    /// Guesses the industry from a business name, defaulting to healthcare
    pub fn guess(name: &str) -> Self {
        let lowered = name.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|w| lowered.contains(w)))
            .map_or(Industry::Healthcare, |(_, industry)| *industry)
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Dental => "Dental",
            Self::Healthcare => "Healthcare",
            Self::MentalHealth => "Mental Health",
            Self::Fitness => "Fitness",
            Self::Beauty => "Beauty",
        };
        f.write_str(label)
    }
}
