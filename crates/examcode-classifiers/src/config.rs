//! Rule tables for normalization and category lookup
//!
//! The built-in tables cover the French radiology vocabulary handled by the
//! imaging center. A deployment can replace them with a YAML file of the
//! same shape:
//!
//! ```yaml
//! normalization:
//!   - pattern: "togd"
//!     replacement: "TOGD (RADIOGRAPHIE DE L'ŒSOPHAGE ET DE L'ESTOMAC)"
//! categories:
//!   - name: RADIO
//!     keywords: [radio, radiographie]
//!     identifier: RX
//! identifiers: [RX, CT, MR, US, MG]
//! default_category: OTHER
//! ```

use examcode_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Category returned when no keyword matches
pub const DEFAULT_CATEGORY: &str = "OTHER";

/// One ordered regex rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    /// Regex applied case-insensitively
    pub pattern: String,

    /// Literal replacement text
    pub replacement: String,
}

impl NormalizationRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Keyword set for one category, with its catalog identifier if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Category name (RADIO, SCANNER, ...)
    pub name: String,

    /// Lowercase trigger substrings
    pub keywords: Vec<String>,

    /// Catalog identifier (RX, CT, ...); absent for categories the gateway does not list
    #[serde(default)]
    pub identifier: Option<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str], identifier: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            identifier: identifier.map(str::to_string),
        }
    }
}

/// Complete rule set used by the query classifier and the catalog fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rewrites applied in order
    #[serde(default)]
    pub normalization: Vec<NormalizationRule>,

    /// Categories in priority order
    #[serde(default)]
    pub categories: Vec<CategoryRule>,

    /// Identifiers the catalog gateway recognizes, in fetch order
    #[serde(default = "default_identifiers")]
    pub identifiers: Vec<String>,

    /// Category returned when nothing matches
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl RuleSet {
    /// Parse a rule set from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let rules: RuleSet = serde_yaml::from_str(yaml)
            .map_err(|e| Error::rules(format!("invalid rule set: {}", e)))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Whether `identifier` (already upper-cased) is recognized by the gateway
    pub fn is_known_identifier(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|i| i == identifier)
    }

    /// Check structural consistency
    pub fn validate(&self) -> Result<()> {
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(Error::rules("category with empty name"));
            }
            if category.keywords.iter().any(|k| k.is_empty()) {
                return Err(Error::rules(format!(
                    "category {} has an empty keyword",
                    category.name
                )));
            }
            if let Some(id) = &category.identifier {
                if !self.is_known_identifier(id) {
                    return Err(Error::rules(format!(
                        "category {} maps to unknown identifier {}",
                        category.name, id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            normalization: default_normalization(),
            categories: default_categories(),
            identifiers: default_identifiers(),
            default_category: default_category(),
        }
    }
}

/// Load a rule set, falling back to the built-in tables when no path is given
pub fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    match path {
        Some(path) => RuleSet::from_file(path).map_err(|e| {
            Error::rules(format!("failed to load rules from {}: {}", path.display(), e))
        }),
        None => Ok(RuleSet::default()),
    }
}

fn default_identifiers() -> Vec<String> {
    ["RX", "CT", "MR", "US", "MG"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("RADIO", &["radio", "radiographie"], Some("RX")),
        CategoryRule::new(
            "SCANNER",
            &["scanner", "tdm", "tomodensitométrie", "scan"],
            Some("CT"),
        ),
        CategoryRule::new(
            "IRM",
            &["irm", "imagerie par résonance magnétique", "rmn"],
            Some("MR"),
        ),
        CategoryRule::new(
            "ECHOGRAPHIE",
            &["echo", "écho", "échographie", "echographie", "échotomographie"],
            Some("US"),
        ),
        CategoryRule::new(
            "MAMMOGRAPHIE",
            &["mammographie", "mammogramme", "mammo", "mamographie", "sein", "mammaire"],
            Some("MG"),
        ),
        CategoryRule::new("IMAGERIE", &["imagerie"], None),
    ]
}

fn default_normalization() -> Vec<NormalizationRule> {
    [
        ("acromioclaviculaire", "ACROMIOCLAVICULAIRE (RADIOGRAPHIE DE L'ARTICULATION ACROMIO-CLAVICULAIRE)"),
        ("pangonogramme", "PANGONOGRAMME (RADIOGRAPHIE DES DENTS)"),
        ("asp", "ASP (RADIOGRAPHIE DE L'ABDOMEN SANS PRÉPARATION)"),
        ("urocanner", "UROSCANNER (SCANNER DES REINS)"),
        ("arm", "ARM (IRM DES VAISSEAUX SANGUINS)"),
        ("bili[- ]?irm", "BILI IRM (IRM DES VOIES BILIAIRES)"),
        ("entero[- ]?irm", "ENTERO IRM (IRM DE L'INTESTIN)"),
        ("entéro[- ]?irm", "ENTERO IRM (IRM DE L'INTESTIN)"),
        ("angio[- ]?irm", "ANGIO IRM (IRM ANGIOGRAPHIQUE DES VAISEAUX SANGUINS)"),
        ("uro[- ]?scanner", "UROSCANNER (SCANNER DES VOIES URINAIRES)"),
        ("dacryoscanner", "DACRYOSCANNER (SCANNER DES VOIES LACRYMALES)"),
        ("coroscanner", "COROSCANNER (SCANNER DES ARTÈRES DU CŒUR)"),
        ("entéroscanner", "ENTEROSCANNER (SCANNER DE L'INTESTIN)"),
        ("coloscanner", "COLOSCANNER (SCANNER DU COLON)"),
        ("arthro[- ]?scanner", "ARTHRO-SCANNER (SCANNER DES ARTICULATIONS)"),
        ("arthro[- ]?irm", "ARTHRO-IRM (IRM DES ARTICULATIONS)"),
        ("ostéodensitométrie", "OSTÉODENSITOMÉTRIE (RADIOGRAPHIE DES OS)"),
        ("cystographie", "CYSTOGRAPHIE (RADIOGRAPHIE DE LA VESSIE)"),
        ("discographie", "DISCOGRAPHIE (RADIOGRAPHIE DU DISQUE INTERVERTÉBRAL)"),
        ("togd", "TOGD (RADIOGRAPHIE DE L'ŒSOPHAGE ET DE L'ESTOMAC)"),
        ("urographie", "UROGRAPHIE (RADIOGRAPHIE DES VOIES URINAIRES)"),
        ("hystérographie", "HYSTÉROGRAPHIE (RADIOGRAPHIE DE LA CAVITÉ UTÉRINE)"),
        ("hystérosalpingographie", "HYSTÉROSALPINGOGRAPHIE (RADIOGRAPHIE DE LA CAVITÉ UTÉRINE)"),
        ("cone[- ]?beam", "CONE BEAM (RADIOGRAPHIE DES DENTS)"),
        ("tomographie", "TOMOGRAPHIE (RADIOGRAPHIE DES DENTS)"),
        ("doppler", "DOPPLER (ÉCHOGRAPHIE DES VAISSEAUX)"),
        ("echodoppler", "ECHODOPPLER (ÉCHOGRAPHIE DOPPLER)"),
        ("echocardiographie", "ECHOCARDIOGRAPHIE (ÉCHOGRAPHIE DU CŒUR)"),
        ("cerebro[- ]?scanner", "CEREBROSCANNER (SCANNER DU CERVEAU)"),
        ("echographie[- ]?endor[ée]?ctale", "ÉCHOGRAPHIE ENDORÉCTALE (ÉCHOGRAPHIE DU RECTUM)"),
        ("echographie[- ]?endovaginale", "ÉCHOGRAPHIE ENDOVAGINALE (ÉCHOGRAPHIE DU VAGIN ET DE L'UTÉRUS)"),
    ]
    .iter()
    .map(|(pattern, replacement)| NormalizationRule::new(*pattern, *replacement))
    .collect()
}
