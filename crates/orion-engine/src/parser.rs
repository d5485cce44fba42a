//! Resolution of requested calendar names against date rule profiles.

use crate::reference_data::DateRules;

/// Requested calendar names resolved to FpML business centres.
///
/// Unknown or disabled names are dropped rather than rejected;
/// [`DateRuleParser::is_valid`] reports whether anything was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRuleParser {
    requested: Vec<String>,
    fpml_names: Vec<String>,
    unresolved: Vec<String>,
}

impl DateRuleParser {
    /// Resolves `names` against the enabled profiles of `rules`.
    pub fn new<S: AsRef<str>>(names: &[S], rules: &DateRules) -> Self {
        let mut requested = Vec::with_capacity(names.len());
        let mut fpml_names: Vec<String> = Vec::new();
        let mut unresolved = Vec::new();
        for name in names {
            let name = name.as_ref();
            requested.push(name.to_string());
            match rules.resolve(name) {
                Some(profile) => {
                    if !fpml_names.contains(&profile.fpml_name) {
                        fpml_names.push(profile.fpml_name.clone());
                    }
                }
                None => unresolved.push(name.to_string()),
            }
        }
        Self {
            requested,
            fpml_names,
            unresolved,
        }
    }

    /// The names as requested.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Distinct business centre codes, in request order.
    pub fn fpml_names(&self) -> &[String] {
        &self.fpml_names
    }

    /// Requested names that matched no enabled profile.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// The supported subset of the request, as business centre codes.
    pub fn calendars_supported(&self) -> Vec<String> {
        self.fpml_names.clone()
    }

    /// True iff every requested name resolved.
    pub fn is_valid(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Business centre codes joined by `-`, e.g. `AUSY-GBLO`.
    pub fn calendar_name(&self) -> String {
        self.fpml_names.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference_data::DateRuleProfile;

    fn rules() -> DateRules {
        DateRules::new(vec![
            DateRuleProfile::new("Sydney", "AUSY"),
            DateRuleProfile::new("London", "GBLO"),
            DateRuleProfile::new("Hell", "NONE"),
            DateRuleProfile::new("Paris", "FRPA").disabled(),
        ])
    }

    #[test]
    fn test_dedupes_in_request_order() {
        let parser = DateRuleParser::new(&["London", "AUSY", "Sydney", "gblo"], &rules());
        assert_eq!(parser.fpml_names(), ["GBLO", "AUSY"]);
        assert_eq!(parser.calendar_name(), "GBLO-AUSY");
        assert!(parser.is_valid());
    }

    #[test]
    fn test_unknown_and_disabled_names_are_dropped() {
        let parser = DateRuleParser::new(&["Sydney", "Paris", "Atlantis"], &rules());
        assert_eq!(parser.calendars_supported(), vec!["AUSY".to_string()]);
        assert_eq!(parser.unresolved(), ["Paris", "Atlantis"]);
        assert!(!parser.is_valid());
        assert_eq!(parser.requested().len(), 3);
    }

    #[test]
    fn test_empty_request_is_valid() {
        let parser = DateRuleParser::new::<&str>(&[], &rules());
        assert!(parser.is_valid());
        assert!(parser.fpml_names().is_empty());
    }
}
