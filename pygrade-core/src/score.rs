//! Scoring policy: domain-specific rules first, then the generic weighted
//! feature score.

use crate::config::ScoringSection;
use crate::types::{DomainAnalysis, DomainLevel, FeatureCounts, SkillAssessment, SkillLevel};

/// Combine feature counts and domain-detector output into an assessment.
///
/// Decision order: a domain match is rated against the exercise criteria
/// and outranks any generic score; otherwise code that is empty in all but
/// name rates `Empty`, and everything else gets the weighted feature score
/// mapped through the configured thresholds. The score is always one of
/// {0, 25, 50, 75, 100}.
pub fn assess(
    source: &str,
    counts: FeatureCounts,
    domain: DomainAnalysis,
    config: &ScoringSection,
) -> SkillAssessment {
    let (level, score) = if domain.is_domain_match {
        match domain.level {
            DomainLevel::Desirable => (SkillLevel::Desirable, 100),
            DomainLevel::Critical => (SkillLevel::Critical, 50),
            // matched the exercise but the calculation does not work
            DomainLevel::DoesNotMeetCriteria => (SkillLevel::WithErrors, 25),
        }
    } else if is_effectively_empty(source, &counts) {
        (SkillLevel::Empty, 0)
    } else {
        let weighted = config.weights.apply(&counts);
        if weighted >= config.advanced_threshold {
            (SkillLevel::Advanced, 75)
        } else if weighted >= config.intermediate_threshold {
            (SkillLevel::Intermediate, 50)
        } else {
            (SkillLevel::Beginner, 25)
        }
    };

    SkillAssessment {
        level,
        score,
        features: counts,
        domain_analysis: domain,
    }
}

/// A parsed body with nothing in it: a single line, or up to three lines
/// without a single function definition.
fn is_effectively_empty(source: &str, counts: &FeatureCounts) -> bool {
    let lines = source.split('\n').count();
    lines <= 1 || (lines <= 3 && counts.functions == 0)
}
