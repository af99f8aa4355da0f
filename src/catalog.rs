//! Element catalog
//!
//! The `game` document: 118 immutable element records, indexed by
//! atomic number minus one. Loaded once and cached in the session.

use serde::{Deserialize, Serialize};

use crate::consts::ELEMENT_COUNT;
use crate::error::LoadError;
use crate::settings::HintToggles;

/// UI / element-name language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "enUS")]
    EnUs,
    #[serde(rename = "esES")]
    EsEs,
    #[serde(rename = "ptBR")]
    PtBr,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::EnUs, Language::EsEs, Language::PtBr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::EnUs => "enUS",
            Language::EsEs => "esES",
            Language::PtBr => "ptBR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }

    /// Display name of the language in its own tongue
    pub fn label(&self) -> &'static str {
        match self {
            Language::EnUs => "English",
            Language::EsEs => "Español",
            Language::PtBr => "Português",
        }
    }
}

/// Chemical family used for group colouring and the `type` hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Alkali,
    AlkaliEarth,
    Metal,
    NobleGas,
    Halogen,
    NonMetal,
    SemiMetal,
    Metalloid,
    Lanthanides,
    Actinides,
}

impl ElementType {
    /// Raw key as it appears in the data document
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Alkali => "alkali",
            ElementType::AlkaliEarth => "alkaliEarth",
            ElementType::Metal => "metal",
            ElementType::NobleGas => "nobleGas",
            ElementType::Halogen => "halogen",
            ElementType::NonMetal => "nonMetal",
            ElementType::SemiMetal => "semiMetal",
            ElementType::Metalloid => "metalloid",
            ElementType::Lanthanides => "lanthanides",
            ElementType::Actinides => "actinides",
        }
    }

    /// CSS class applied to a cell when group colours are shown
    pub fn color_class(&self) -> &'static str {
        match self {
            ElementType::Alkali => "bg-red-400",
            ElementType::AlkaliEarth => "bg-rose-300",
            ElementType::Metal => "bg-orange-200",
            ElementType::NobleGas => "bg-purple-400",
            ElementType::Halogen => "bg-indigo-300",
            ElementType::NonMetal => "bg-sky-300",
            ElementType::SemiMetal => "bg-lime-200",
            ElementType::Metalloid => "bg-emerald-200",
            ElementType::Lanthanides => "bg-indigo-200",
            ElementType::Actinides => "bg-sky-200",
        }
    }
}

/// Localised element name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalName {
    pub name: String,
}

/// A single element record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub protons: u32,
    pub mass: f64,
    pub symbol: String,
    /// Electron configuration, exponents written as `^n`
    pub electron: String,
    pub group: String,
    pub family: String,
    pub period: String,
    pub block: String,
    #[serde(rename = "type")]
    pub kind: ElementType,
    #[serde(rename = "enUS")]
    pub en_us: LocalName,
    #[serde(rename = "esES")]
    pub es_es: LocalName,
    #[serde(rename = "ptBR")]
    pub pt_br: LocalName,
}

impl Element {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::EnUs => &self.en_us.name,
            Language::EsEs => &self.es_es.name,
            Language::PtBr => &self.pt_br.name,
        }
    }

    /// Position in the catalog; `None` for protons 0
    pub fn index(&self) -> Option<usize> {
        (self.protons as usize).checked_sub(1)
    }
}

/// The full element list, validated to hold protons 1..=118 in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    elements: Vec<Element>,
}

impl Catalog {
    pub fn new(elements: Vec<Element>) -> Result<Self, LoadError> {
        if elements.len() != ELEMENT_COUNT {
            return Err(LoadError::CatalogSize {
                found: elements.len(),
                expected: ELEMENT_COUNT,
            });
        }
        if let Some((index, e)) = elements
            .iter()
            .enumerate()
            .find(|(i, e)| e.protons as usize != i + 1)
        {
            return Err(LoadError::CatalogOrder {
                index,
                protons: e.protons,
            });
        }
        Ok(Self { elements })
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, LoadError> {
        Self::new(serde_json::from_value(value)?)
    }

    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn by_protons(&self, protons: u32) -> Option<&Element> {
        (protons as usize).checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let elements = Vec::<Element>::deserialize(deserializer)?;
        Catalog::new(elements).map_err(serde::de::Error::custom)
    }
}

/// A single line in the hint panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub label: &'static str,
    pub value: String,
}

/// Build the hint panel for `element`: one line per enabled toggle
pub fn hints(element: &Element, toggles: &HintToggles, language: Language) -> Vec<Hint> {
    let fields: [(bool, &'static str, String); 10] = [
        (toggles.name, "Name", element.name(language).to_string()),
        (toggles.family, "Family", element.family.clone()),
        (toggles.symbol, "Symbol", element.symbol.clone()),
        (toggles.electron, "Electron", superscript_exponents(&element.electron)),
        (toggles.mass, "Mass", format!("{:.2}", element.mass)),
        (toggles.protons, "Protons", element.protons.to_string()),
        (toggles.group, "Group", element.group.clone()),
        (toggles.period, "Period", element.period.clone()),
        (toggles.block, "Block", element.block.clone()),
        (toggles.kind, "Type", split_camel_case(element.kind.as_str())),
    ];

    fields
        .into_iter()
        .filter(|(on, _, _)| *on)
        .map(|(_, label, value)| Hint { label, value })
        .collect()
}

/// `1s^2 2s^1` -> `1s² 2s¹`
pub fn superscript_exponents(config: &str) -> String {
    const SUPERSCRIPTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

    let mut out = String::with_capacity(config.len());
    let mut chars = config.chars().peekable();
    while let Some(c) = chars.next() {
        let starts_exponent = c == '^' && chars.peek().is_some_and(|n| n.is_ascii_digit());
        if !starts_exponent {
            out.push(c);
            continue;
        }
        while let Some(d) = chars.peek().and_then(|n| n.to_digit(10)) {
            out.push(SUPERSCRIPTS[d as usize]);
            chars.next();
        }
    }
    out
}

/// `alkaliEarth` -> `Alkali Earth`
pub fn split_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_ascii_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}
