#![warn(missing_docs)]
//! `cursor-core-lang` - data-driven language configuration for `cursor-core`.
//!
//! A [`LanguageConfiguration`] bundles the per-language tables the cursor controller consults
//! while editing:
//!
//! - bracket pairs and [`OnEnterRule`]s, evaluated when Enter is pressed,
//! - [`IndentationRules`] (increase / decrease / indent-next-line / unindented-line regexes),
//! - [`AutoClosingPair`]s and surrounding pairs,
//! - a word pattern for word navigation.
//!
//! Configurations are looked up through the pull-based [`LanguageConfigProvider`] trait;
//! [`LanguageRegistry`] is the in-memory implementation. They can be built in code or loaded
//! from a `language-configuration.json` document with [`LanguageConfiguration::from_json`].

mod config;
mod error;
mod json;
mod pairs;
mod pattern;
mod registry;
mod rules;

pub use config::LanguageConfiguration;
pub use error::LanguageConfigError;
pub use pairs::{
    AutoClosingPair, CharacterPair, DEFAULT_AUTO_CLOSE_BEFORE, ScopeKind, is_quote_text,
};
pub use pattern::Pattern;
pub use registry::{LanguageConfigProvider, LanguageRegistry};
pub use rules::{EnterAction, IndentAction, IndentMetadata, IndentationRules, OnEnterRule};
