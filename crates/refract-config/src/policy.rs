//! Per-run policies for inputs that do not transform cleanly.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// What a run emits when a transformation finds nothing to rewrite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, EnumString, Display, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NoMatchPolicy {
    /// Emit a `no_match` marker without source text.
    Skip,
    /// Emit a `no_match` record carrying the original source text.
    #[value(alias = "pass_through")]
    PassThrough,
}

/// How a run treats sources that already contain syntax errors.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    EnumString,
    Display,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MalformedInputPolicy {
    /// Transform them; a rewrite may not add errors of its own.
    #[default]
    Accept,
    /// Mark every transformation of the record as failed.
    Reject,
}

/// Where output records are written.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    EnumString,
    Display,
    ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OutputLayout {
    /// One JSON Lines stream for every transformation.
    #[default]
    Single,
    /// A directory holding one `<name>.jsonl` file per transformation.
    #[value(alias = "per_transformation")]
    PerTransformation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("skip", NoMatchPolicy::Skip)]
    #[case("pass_through", NoMatchPolicy::PassThrough)]
    #[case("PASS_THROUGH", NoMatchPolicy::PassThrough)]
    fn parses_no_match_policy(#[case] text: &str, #[case] expected: NoMatchPolicy) {
        assert_eq!(text.parse::<NoMatchPolicy>().expect("policy"), expected);
    }

    #[test]
    fn cli_spelling_is_kebab_case() {
        let value = NoMatchPolicy::PassThrough
            .to_possible_value()
            .expect("visible value");
        assert_eq!(value.get_name(), "pass-through");
        assert_eq!(
            <NoMatchPolicy as ValueEnum>::from_str("pass_through", false),
            Ok(NoMatchPolicy::PassThrough)
        );
        assert_eq!(OutputLayout::PerTransformation.to_string(), "per_transformation");
    }

    #[test]
    fn toml_spelling_is_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: MalformedInputPolicy,
        }
        let parsed: Wrapper = toml::from_str("policy = \"reject\"").expect("toml");
        assert_eq!(parsed.policy, MalformedInputPolicy::Reject);
    }
}
