//! Free-text genre classification onto a controlled taxonomy
//!
//! A [`Taxonomy`] is an ordered table of rules. Each rule pairs a substring
//! predicate with a [`Label`]; the first rule whose predicate matches the
//! lower-cased input wins, and input matching no rule falls through to the
//! catch-all label.
//!
//! # Rule Order
//!
//! Genre strings are not mutually exclusive as substrings. A string such as
//! `"soft rock pop"` contains both `"pop"` and `"soft rock"`, so the rule table
//! states the exclusion explicitly (`"pop"` but none of `["soft rock"]`) before
//! the general rules. Reordering the table changes the result.
//!
//! # Predicates
//!
//! A rule predicate is the conjunction of three substring lists:
//!
//! - `any_of`: alternate spellings, at least one must appear
//! - `all_of`: every listed substring must appear
//! - `none_of`: no listed substring may appear
//!
//! An empty `any_of` or `all_of` list imposes no constraint, but every rule
//! needs at least one substring in one of them.
//!
//! # Configuration
//!
//! Taxonomies are plain values built from a [`TaxonomyConfig`], either loaded
//! from JSON or taken from a built-in [`TaxonomyPreset`]:
//!
//! ```json
//! {
//!   "catch_all": "Other",
//!   "rules": [
//!     { "label": "Pop", "any_of": ["pop"], "none_of": ["soft rock"] },
//!     { "label": "Soft Rock", "any_of": ["soft rock"] },
//!     { "label": "Alternative Rock", "all_of": ["alt", "rock"] }
//!   ]
//! }
//! ```
//!
//! # Examples
//!
//! ```
//! use genrescope_analysis::taxonomy::{Taxonomy, TaxonomyPreset};
//!
//! let taxonomy = Taxonomy::preset(TaxonomyPreset::Century);
//! assert_eq!(taxonomy.classify("Soft Rock, Pop").as_str(), "Soft Rock");
//! assert_eq!(taxonomy.classify("dance pop").as_str(), "Pop");
//! assert_eq!(taxonomy.classify("Alternative Rock").as_str(), "Alternative Rock");
//! assert_eq!(taxonomy.classify("").as_str(), "Other");
//! ```

use serde::{Deserialize, Serialize};

/// A member of a taxonomy's controlled vocabulary.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

pub const DEFAULT_CATCH_ALL: &str = "Other";

fn default_catch_all() -> String {
    DEFAULT_CATCH_ALL.to_owned()
}

/// Declarative form of a taxonomy, as stored in JSON files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyConfig {
    /// Label assigned when no rule matches
    #[serde(default = "default_catch_all")]
    pub catch_all: String,
    /// Rules in evaluation order
    pub rules: Vec<RuleConfig>,
}

/// One row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub none_of: Vec<String>,
}

impl RuleConfig {
    /// Rule matching when any of `needles` appears.
    #[must_use]
    pub fn any_of<const N: usize>(label: &str, needles: [&str; N]) -> Self {
        Self {
            label: label.to_owned(),
            any_of: needles.iter().map(|&s| s.to_owned()).collect(),
            all_of: vec![],
            none_of: vec![],
        }
    }

    /// Rule matching when all of `needles` appear.
    #[must_use]
    pub fn all_of<const N: usize>(label: &str, needles: [&str; N]) -> Self {
        Self {
            label: label.to_owned(),
            any_of: vec![],
            all_of: needles.iter().map(|&s| s.to_owned()).collect(),
            none_of: vec![],
        }
    }

    /// Adds exclusion substrings to this rule.
    #[must_use]
    pub fn excluding<const N: usize>(mut self, needles: [&str; N]) -> Self {
        self.none_of.extend(needles.iter().map(|&s| s.to_owned()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TaxonomyError {
    #[display("catch-all label must not be empty")]
    EmptyCatchAll,
    #[display("rule #{index} has an empty label")]
    EmptyLabel { index: usize },
    #[display("rule #{index} ('{label}') has no any_of or all_of substring")]
    NoPositiveNeedle { index: usize, label: String },
    #[display("rule #{index} ('{label}') contains an empty substring")]
    EmptyNeedle { index: usize, label: String },
}

/// Built-in taxonomies.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum TaxonomyPreset {
    /// Seventeen labels for a century of classic hits.
    #[default]
    Century,
    /// Eleven labels for per-country Top 50 charts.
    Global,
}

impl TaxonomyPreset {
    #[must_use]
    pub fn config(self) -> TaxonomyConfig {
        match self {
            TaxonomyPreset::Century => century_config(),
            TaxonomyPreset::Global => global_config(),
        }
    }
}

fn century_config() -> TaxonomyConfig {
    TaxonomyConfig {
        catch_all: default_catch_all(),
        rules: vec![
            RuleConfig::any_of("Pop", ["pop"]).excluding(["soft rock"]),
            RuleConfig::any_of("Soft Rock", ["soft rock"]),
            RuleConfig::all_of("Alternative Rock", ["alt", "rock"]),
            RuleConfig::any_of("Hard Rock", ["hard rock"]),
            RuleConfig::any_of("Punk", ["punk"]),
            RuleConfig::any_of("Hip Hop", ["hip hop", "hip-hop"]),
            RuleConfig::any_of("R&B", ["r&b", "rnb"]),
            RuleConfig::any_of("Funk", ["funk"]),
            RuleConfig::any_of("Jazz", ["jazz"]),
            RuleConfig::any_of("Blues", ["blues"]),
            RuleConfig::any_of("Country", ["country"]),
            RuleConfig::any_of("Electronic", ["electronic", "edm"]),
            RuleConfig::any_of("Rock", ["rock"]),
            RuleConfig::any_of("Soul", ["soul"]),
            RuleConfig::any_of("Disco", ["disco"]),
            RuleConfig::any_of("Reggae", ["reggae"]),
            RuleConfig::any_of("Folk", ["folk"]),
        ],
    }
}

fn global_config() -> TaxonomyConfig {
    TaxonomyConfig {
        catch_all: default_catch_all(),
        rules: vec![
            RuleConfig::any_of("Pop", ["pop"]),
            RuleConfig::any_of("Hip Hop / Rap", ["rap", "hip hop"]),
            RuleConfig::any_of(
                "Latin",
                [
                    "latin",
                    "reggaeton",
                    "colombian",
                    "argentine",
                    "panamanian",
                    "espanol",
                ],
            ),
            RuleConfig::any_of("Electronic / Dance", ["edm", "electro", "house", "dance"]),
            RuleConfig::any_of("R&B", ["r&b"]),
            RuleConfig::any_of("Rock", ["rock", "wave"]),
            RuleConfig::any_of("Indie / Alternative", ["indie"]),
            RuleConfig::any_of("Brazilian", ["sertanejo", "funk carioca", "brega funk"]),
            // K-Pop and J-Pop are shadowed by "Pop" above; kept so the labels stay in the vocabulary.
            RuleConfig::any_of("K-Pop", ["k-pop"]),
            RuleConfig::any_of("J-Pop", ["j-pop"]),
            RuleConfig::any_of("South Asian", ["desi", "bollywood", "punjabi"]),
        ],
    }
}

#[derive(Debug, Clone)]
struct Predicate {
    any_of: Vec<String>,
    all_of: Vec<String>,
    none_of: Vec<String>,
}

impl Predicate {
    fn matches(&self, text: &str) -> bool {
        (self.any_of.is_empty() || self.any_of.iter().any(|n| text.contains(n.as_str())))
            && self.all_of.iter().all(|n| text.contains(n.as_str()))
            && !self.none_of.iter().any(|n| text.contains(n.as_str()))
    }
}

#[derive(Debug, Clone)]
struct Rule {
    label: Label,
    predicate: Predicate,
}

/// A validated, ordered rule table.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    config: TaxonomyConfig,
    rules: Vec<Rule>,
    catch_all: Label,
    labels: Vec<Label>,
}

impl Taxonomy {
    /// Validates `config` and builds the rule table.
    ///
    /// Substrings are lower-cased here so that classification only has to
    /// lower-case its input.
    pub fn new(config: TaxonomyConfig) -> Result<Self, TaxonomyError> {
        if config.catch_all.trim().is_empty() {
            return Err(TaxonomyError::EmptyCatchAll);
        }

        let mut rules = Vec::with_capacity(config.rules.len());
        for (index, rule) in config.rules.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(TaxonomyError::EmptyLabel { index });
            }
            if rule.any_of.is_empty() && rule.all_of.is_empty() {
                return Err(TaxonomyError::NoPositiveNeedle {
                    index,
                    label: rule.label.clone(),
                });
            }
            let lower = |needles: &[String]| -> Result<Vec<String>, TaxonomyError> {
                needles
                    .iter()
                    .map(|n| {
                        if n.is_empty() {
                            Err(TaxonomyError::EmptyNeedle {
                                index,
                                label: rule.label.clone(),
                            })
                        } else {
                            Ok(n.to_lowercase())
                        }
                    })
                    .collect()
            };
            rules.push(Rule {
                label: Label::new(rule.label.as_str()),
                predicate: Predicate {
                    any_of: lower(&rule.any_of)?,
                    all_of: lower(&rule.all_of)?,
                    none_of: lower(&rule.none_of)?,
                },
            });
        }

        let catch_all = Label::new(config.catch_all.as_str());
        let mut labels: Vec<Label> = vec![];
        for label in rules.iter().map(|r| &r.label).chain([&catch_all]) {
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }

        Ok(Self {
            config,
            rules,
            catch_all,
            labels,
        })
    }

    /// Builds one of the built-in taxonomies.
    #[must_use]
    pub fn preset(preset: TaxonomyPreset) -> Self {
        Self::new(preset.config()).expect("built-in taxonomies are valid")
    }

    /// Classifies a free-text genre string.
    ///
    /// Never fails: empty or unmatched input yields the catch-all label.
    #[must_use]
    pub fn classify(&self, raw: &str) -> &Label {
        let text = raw.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&text))
            .map_or(&self.catch_all, |rule| &rule.label)
    }

    /// Classifies a raw JSON value; anything other than a string yields the
    /// catch-all label.
    #[must_use]
    pub fn classify_value(&self, raw: &serde_json::Value) -> &Label {
        match raw {
            serde_json::Value::String(text) => self.classify(text),
            _ => &self.catch_all,
        }
    }

    #[must_use]
    pub fn catch_all(&self) -> &Label {
        &self.catch_all
    }

    /// All labels this taxonomy can produce, in rule order with the catch-all last.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[must_use]
    pub fn config(&self) -> &TaxonomyConfig {
        &self.config
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::preset(TaxonomyPreset::default())
    }
}
