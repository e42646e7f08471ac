//! Applicability filter.

use super::types::{ApplicabilityRule, ApplicabilityVerdict};
use crate::characteristics::CodebaseCharacteristics;

/// Stateless applicability check.
///
/// A gate is applicable iff at least one required technology is present and
/// no exclusion holds. Gates without requirements are always applicable
/// (subject to exclusions). When the technology mix is ambiguous the
/// requirement check is waived, so relevant findings are never hidden.
pub struct ApplicabilityFilter;

impl ApplicabilityFilter {
    pub fn evaluate(
        rule: &ApplicabilityRule,
        characteristics: &CodebaseCharacteristics,
    ) -> ApplicabilityVerdict {
        let held: Vec<&'static str> = rule
            .excludes
            .iter()
            .filter(|e| e.holds(characteristics))
            .map(|e| e.as_str())
            .collect();
        let is_excluded = !held.is_empty();

        if rule.requires.is_empty() {
            return ApplicabilityVerdict {
                is_applicable: !is_excluded,
                reason: if is_excluded {
                    format!("Excluded: codebase is {}", held.join(", "))
                } else {
                    "Applies to all codebases".to_string()
                },
                required_technologies: Vec::new(),
                has_required: true,
                is_excluded,
            };
        }

        let required = rule.requires.clone();
        let required_names: Vec<&str> = required.iter().map(|t| t.as_str()).collect();

        if characteristics.is_ambiguous() {
            return ApplicabilityVerdict {
                is_applicable: !is_excluded,
                reason: if is_excluded {
                    format!("Excluded: codebase is {}", held.join(", "))
                } else {
                    format!(
                        "Technology mix is ambiguous; evaluated by default (requires {})",
                        required_names.join(" or ")
                    )
                },
                required_technologies: required,
                has_required: false,
                is_excluded,
            };
        }

        let has_required = rule.requires.iter().any(|t| t.is_present(characteristics));
        let is_applicable = has_required && !is_excluded;
        let reason = if is_applicable {
            format!("Codebase has {}", required_names.join(" or "))
        } else if is_excluded {
            format!("Excluded: codebase is {}", held.join(", "))
        } else {
            format!(
                "Requires {} (primary technology: {})",
                required_names.join(" or "),
                characteristics.primary_technology
            )
        };

        ApplicabilityVerdict {
            is_applicable,
            reason,
            required_technologies: required,
            has_required,
            is_excluded,
        }
    }
}
