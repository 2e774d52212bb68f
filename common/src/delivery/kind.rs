use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The regression strategies served by the registry.
///
/// Declaration order is significant: it is the tie-break order used when
/// two models are equally accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "simpleRegression")]
    Simple,
    #[serde(rename = "multipleRegression")]
    Multiple,
    #[serde(rename = "polynomialRegression")]
    Polynomial,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Simple, ModelKind::Multiple, ModelKind::Polynomial];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Simple => "simple",
            ModelKind::Multiple => "multiple",
            ModelKind::Polynomial => "polynomial",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} regression", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    /// Accepts the short names (`simple`, `multiple`, `polynomial`), their
    /// first letters, and the camelCase report keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" | "s" | "simpleregression" => Ok(ModelKind::Simple),
            "multiple" | "m" | "multipleregression" => Ok(ModelKind::Multiple),
            "polynomial" | "p" | "polynomialregression" => Ok(ModelKind::Polynomial),
            _ => Err(format!("unknown model kind: {s}")),
        }
    }
}

/// One value per model kind, serialized under the report keys
/// (`simpleRegression`, `multipleRegression`, `polynomialRegression`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerModel<T> {
    #[serde(rename = "simpleRegression")]
    pub simple: T,
    #[serde(rename = "multipleRegression")]
    pub multiple: T,
    #[serde(rename = "polynomialRegression")]
    pub polynomial: T,
}

impl<T> PerModel<T> {
    pub fn from_fn(mut f: impl FnMut(ModelKind) -> T) -> Self {
        Self {
            simple: f(ModelKind::Simple),
            multiple: f(ModelKind::Multiple),
            polynomial: f(ModelKind::Polynomial),
        }
    }

    pub fn get(&self, kind: ModelKind) -> &T {
        match kind {
            ModelKind::Simple => &self.simple,
            ModelKind::Multiple => &self.multiple,
            ModelKind::Polynomial => &self.polynomial,
        }
    }

    pub fn get_mut(&mut self, kind: ModelKind) -> &mut T {
        match kind {
            ModelKind::Simple => &mut self.simple,
            ModelKind::Multiple => &mut self.multiple,
            ModelKind::Polynomial => &mut self.polynomial,
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(ModelKind, &T) -> U) -> PerModel<U> {
        PerModel::from_fn(|kind| f(kind, self.get(kind)))
    }

    /// Iterates in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelKind, &T)> {
        ModelKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_report_names() {
        assert_eq!("simple".parse::<ModelKind>(), Ok(ModelKind::Simple));
        assert_eq!("M".parse::<ModelKind>(), Ok(ModelKind::Multiple));
        assert_eq!("polynomialRegression".parse::<ModelKind>(), Ok(ModelKind::Polynomial));
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = "cubic".parse::<ModelKind>();
        assert_eq!(result, Err("unknown model kind: cubic".to_string()));
    }

    #[test]
    fn all_is_in_tie_break_order() {
        let mut sorted = ModelKind::ALL;
        sorted.sort();
        assert_eq!(sorted, ModelKind::ALL);
    }

    #[test]
    fn per_model_map_keeps_kinds_aligned() {
        let names = PerModel::from_fn(|kind| kind.as_str().len());
        let doubled = names.map(|_, len| len * 2);
        assert_eq!(doubled.simple, 12);
        assert_eq!(doubled.multiple, 16);
        assert_eq!(*doubled.get(ModelKind::Polynomial), 20);
    }

    #[test]
    fn serializes_as_report_key() {
        let json = serde_json::to_string(&ModelKind::Multiple).unwrap();
        assert_eq!(json, "\"multipleRegression\"");
    }
}
