//! Command-line argument model
//!
//! Arguments arrive as `name=value` tokens, or as a bare `name` for flags.
//! They are collected once into an immutable [`ArgumentBag`] and read back
//! through typed accessors that report precisely which argument was wrong.
//!
//! ## Token rules
//!
//! - A token is split on its FIRST `=`: `defines=A=1` is `defines` → `A=1`.
//! - A bare token stores [`FLAG_VALUE`] (`"true"`), so `getAsBool` on a flag
//!   reads as `true`.
//! - An empty token, or one starting with `=`, is malformed.
//! - A name given twice keeps its last value.

pub mod names;
pub mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use anyhow::Result;
use clap::ValueEnum;

use crate::error::BuildError;
use schema::ArgumentSchema;

/// Value stored for a bare token
pub const FLAG_VALUE: &str = "true";

/// Immutable mapping of argument name to raw value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentBag {
    values: BTreeMap<String, String>,
}

impl ArgumentBag {
    /// Parse command-line tokens
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for token in tokens {
            let token = token.as_ref();
            if token.trim().is_empty() || token.starts_with('=') {
                return Err(BuildError::malformed(token).into());
            }

            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, value),
                None => (token, FLAG_VALUE),
            };
            values.insert(name.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over `(name, value)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Raw value of `name`, failing when it is absent
    pub fn get(&self, name: &str) -> Result<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| BuildError::missing(name).into())
    }

    /// Raw value of `name`, if present
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_as_int(&self, name: &str) -> Result<i64> {
        let raw = self.get(name)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|_| BuildError::invalid_value(name, raw, "an integer").into())
    }

    pub fn get_as_float(&self, name: &str) -> Result<f64> {
        let raw = self.get(name)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| BuildError::invalid_value(name, raw, "a number").into())
    }

    /// Read `true`/`false` (case-insensitive)
    pub fn get_as_bool(&self, name: &str) -> Result<bool> {
        let raw = self.get(name)?;
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(BuildError::invalid_value(name, raw, "true or false").into())
        }
    }

    /// Match the raw value case-insensitively against the names of `E`
    ///
    /// Single member only; use [`Self::get_as_flags`] for `A|B` combinations.
    pub fn get_as_enum<E: ValueEnum>(&self, name: &str) -> Result<E> {
        let raw = self.get(name)?;
        parse_enum_member::<E>(name, raw, raw.trim())
    }

    /// Read a `|`-separated combination of flag members
    ///
    /// The result is the bitwise OR of every listed member; one unknown
    /// member fails the whole value.
    pub fn get_as_flags<E: FlagEnum>(&self, name: &str) -> Result<FlagSet<E>> {
        let raw = self.get(name)?;
        let mut bits = 0u32;
        for part in raw.split('|') {
            let member = parse_enum_member::<E>(name, raw, part.trim())?;
            bits |= member.bits();
        }
        Ok(FlagSet::from_bits(bits))
    }

    /// Read a `;`-separated list, dropping empty entries
    pub fn get_as_list(&self, name: &str) -> Result<Vec<String>> {
        let raw = self.get(name)?;
        Ok(raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Fail unless every name is present, reporting all absent names at once
    pub fn assert_keys(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.contains(n))
            .map(|n| n.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BuildError::missing_required(missing, None).into())
        }
    }

    /// Fail unless every argument the schema marks required is present
    ///
    /// With `is_command_line` the error carries the schema description as
    /// usage text, since the user typed these arguments by hand.
    pub fn assert_required(&self, schema: &ArgumentSchema, is_command_line: bool) -> Result<()> {
        let missing: Vec<String> = schema
            .required_names()
            .filter(|n| !self.contains(n))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let usage = is_command_line.then(|| format!("Expected arguments:\n{}", schema.describe(4)));
        Err(BuildError::missing_required(missing, usage).into())
    }

    pub fn is_verbose(&self) -> bool {
        self.contains(names::common::VERBOSE)
    }

    /// Render every pair through `template`, replacing `{name}` and `{value}`
    pub fn format(&self, template: &str) -> String {
        self.iter()
            .map(|(name, value)| template.replace("{name}", name).replace("{value}", value))
            .collect()
    }
}

impl fmt::Display for ArgumentBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", tokens.join(" "))
    }
}

fn parse_enum_member<E: ValueEnum>(name: &str, raw: &str, member: &str) -> Result<E> {
    E::from_str(member, true).map_err(|_| {
        let expected: Vec<String> = E::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|p| p.get_name().to_string())
            .collect();
        BuildError::invalid_value(name, raw, format!("one of {}", expected.join(", "))).into()
    })
}

/// Enumerations whose members combine as bit flags
pub trait FlagEnum: ValueEnum + Copy {
    fn bits(self) -> u32;
}

/// Bitwise combination of [`FlagEnum`] members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSet<E> {
    bits: u32,
    _marker: PhantomData<E>,
}

impl<E: FlagEnum> FlagSet<E> {
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    pub fn from_members(members: &[E]) -> Self {
        Self::from_bits(members.iter().fold(0, |acc, m| acc | m.bits()))
    }

    pub fn contains(&self, member: E) -> bool {
        let bits = member.bits();
        bits != 0 && self.bits & bits == bits
    }

    /// Single-bit members contained in the set, in declaration order
    pub fn members(&self) -> Vec<E> {
        E::value_variants()
            .iter()
            .copied()
            .filter(|m| m.bits().is_power_of_two() && self.contains(*m))
            .collect()
    }
}

impl<E: FlagEnum> fmt::Display for FlagSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .members()
            .iter()
            .filter_map(|m| m.to_possible_value())
            .map(|p| p.get_name().to_string())
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// Canonical symbolic name of an enum member
pub fn enum_name<E: ValueEnum>(value: &E) -> String {
    value
        .to_possible_value()
        .map(|p| p.get_name().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Color {
        #[value(name = "Red")]
        Red,
        #[value(name = "DarkBlue")]
        DarkBlue,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Perm {
        #[value(name = "X")]
        X,
        #[value(name = "Y")]
        Y,
        #[value(name = "Z")]
        Z,
    }

    impl FlagEnum for Perm {
        fn bits(self) -> u32 {
            match self {
                Perm::X => 1,
                Perm::Y => 2,
                Perm::Z => 4,
            }
        }
    }

    fn bag(tokens: &[&str]) -> ArgumentBag {
        ArgumentBag::parse(tokens.iter().copied()).unwrap()
    }

    fn error_of(err: anyhow::Error) -> BuildError {
        err.downcast::<BuildError>().unwrap()
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let args = bag(&["out=./a=b", "debug", "empty="]);
        assert_eq!(args.get("out").unwrap(), "./a=b");
        assert_eq!(args.get("debug").unwrap(), FLAG_VALUE);
        assert_eq!(args.get("empty").unwrap(), "");
    }

    #[test]
    fn test_parse_rejects_malformed_tokens() {
        for token in ["", "=value", "   "] {
            let err = ArgumentBag::parse([token]).unwrap_err();
            assert!(matches!(error_of(err), BuildError::MalformedArgument { .. }));
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let args = bag(&["Out=x"]);
        assert!(args.contains("Out"));
        assert!(!args.contains("out"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let args = bag(&["buildNumber=1", "buildNumber=2"]);
        assert_eq!(args.iter().count(), 1);
        assert_eq!(args.get_as_int("buildNumber").unwrap(), 2);
    }

    #[test]
    fn test_parse_then_format_round_trips() {
        let tokens = ["b=2", "a=1", "flag", "path=C:/x=y", "blank="];
        let args = bag(&tokens);
        let rendered = args.format("{name}={value}\n");
        let got: BTreeSet<(String, String)> = rendered
            .lines()
            .map(|l| {
                let (k, v) = l.split_once('=').unwrap();
                (k.to_string(), v.to_string())
            })
            .collect();
        let expected: BTreeSet<(String, String)> = [
            ("a", "1"),
            ("b", "2"),
            ("flag", FLAG_VALUE),
            ("path", "C:/x=y"),
            ("blank", ""),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_get_missing() {
        let err = bag(&[]).get("out").unwrap_err();
        assert!(matches!(error_of(err), BuildError::MissingArgument { name } if name == "out"));
    }

    #[test]
    fn test_typed_accessors() {
        let args = bag(&["w= 1920 ", "r=2.1", "yes=TRUE", "no=false", "flag", "bad=1,5"]);
        assert_eq!(args.get_as_int("w").unwrap(), 1920);
        assert!((args.get_as_float("r").unwrap() - 2.1).abs() < f64::EPSILON);
        assert!(args.get_as_bool("yes").unwrap());
        assert!(!args.get_as_bool("no").unwrap());
        assert!(args.get_as_bool("flag").unwrap());

        let err = args.get_as_float("bad").unwrap_err();
        assert!(matches!(
            error_of(err),
            BuildError::InvalidArgumentValue { name, raw, .. } if name == "bad" && raw == "1,5"
        ));
        assert!(args.get_as_int("r").is_err());
        assert!(args.get_as_bool("w").is_err());
    }

    #[test]
    fn test_get_as_enum_is_case_insensitive() {
        let args = bag(&["c=darkblue", "d=Purple"]);
        assert_eq!(args.get_as_enum::<Color>("c").unwrap(), Color::DarkBlue);

        let err = args.get_as_enum::<Color>("d").unwrap_err();
        match error_of(err) {
            BuildError::InvalidArgumentValue { expected, .. } => {
                assert!(expected.contains("Red"));
                assert!(expected.contains("DarkBlue"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_get_as_flags_combines_members() {
        let args = bag(&["p=X|y", "q=X|W", "r=Z"]);
        let set = args.get_as_flags::<Perm>("p").unwrap();
        assert_eq!(set, FlagSet::from_bits(1 | 2));
        assert!(set.contains(Perm::X));
        assert!(set.contains(Perm::Y));
        assert!(!set.contains(Perm::Z));
        assert_eq!(set.to_string(), "X|Y");

        let err = args.get_as_flags::<Perm>("q").unwrap_err();
        assert!(matches!(error_of(err), BuildError::InvalidArgumentValue { raw, .. } if raw == "X|W"));

        assert_eq!(args.get_as_flags::<Perm>("r").unwrap(), FlagSet::from_members(&[Perm::Z]));

        // a combination is only understood by the flag accessor
        assert!(args.get_as_enum::<Perm>("p").is_err());
        assert_eq!(args.get_as_enum::<Perm>("r").unwrap(), Perm::Z);
    }

    #[test]
    fn test_get_as_list() {
        let args = bag(&["defs=A; B;;C"]);
        assert_eq!(args.get_as_list("defs").unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_assert_required_reports_all_missing() {
        const SCHEMA: ArgumentSchema = ArgumentSchema::new(&[
            schema::ArgumentDescriptor::required("A", ""),
            schema::ArgumentDescriptor::required("B", ""),
            schema::ArgumentDescriptor::required("C", ""),
            schema::ArgumentDescriptor::optional("D", ""),
        ]);

        let args = bag(&["A=1"]);
        let err = args.assert_required(&SCHEMA, true).unwrap_err();
        match error_of(err) {
            BuildError::MissingRequiredArgument { names, usage } => {
                assert_eq!(names, vec!["B", "C"]);
                assert!(usage.unwrap().contains("A [required]"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = args.assert_required(&SCHEMA, false).unwrap_err();
        assert!(matches!(
            error_of(err),
            BuildError::MissingRequiredArgument { usage: None, .. }
        ));

        assert!(bag(&["A", "B", "C"]).assert_required(&SCHEMA, true).is_ok());
    }

    #[test]
    fn test_assert_keys() {
        let args = bag(&["a=1"]);
        assert!(args.assert_keys(&["a"]).is_ok());
        let err = args.assert_keys(&["a", "b", "c"]).unwrap_err();
        assert!(matches!(
            error_of(err),
            BuildError::MissingRequiredArgument { names, .. } if names == vec!["b", "c"]
        ));
    }

    #[test]
    fn test_verbose_flag_and_display() {
        let args = bag(&["verbose", "out=x"]);
        assert!(args.is_verbose());
        assert_eq!(args.to_string(), "out=x verbose=true");
    }
}
