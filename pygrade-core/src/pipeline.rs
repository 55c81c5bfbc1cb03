use tracing::{debug, instrument};

use crate::config::AnalyzerConfig;
use crate::parse::{self, ParseOutcome};
use crate::types::{
    AnalysisReport, PythonVersion, SkillAssessment, Submission, Suggestion, ValidationResult,
};
use crate::{domain, features, score, suggest};

/// The analysis pipeline: parse → extract → detect → score.
///
/// A pure, synchronous computation over one input string. Holds only the
/// immutable configuration, so concurrent use is safe by construction.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Run the end-to-end validation pipeline over one submission.
    ///
    /// Never fails: empty input, syntax errors, and parser faults all
    /// produce a fully populated result. The domain detector runs over the
    /// raw text even when parsing fails.
    #[instrument(skip_all, fields(bytes = source.len(), version = version.as_str()))]
    pub fn validate(&self, source: &str, version: PythonVersion) -> ValidationResult {
        if source.trim().is_empty() {
            debug!("Empty submission");
            return ValidationResult::empty();
        }

        match parse::parse(source, version) {
            ParseOutcome::Parsed(parsed) => {
                let counts = features::extract(&parsed);
                let domain = domain::analyze(source);
                let assessment = score::assess(source, counts, domain, &self.config.scoring);
                debug!(level = %assessment.level, score = assessment.score, "Valid submission");
                ValidationResult {
                    valid: true,
                    error_message: String::new(),
                    error_line: -1,
                    skill_assessment: assessment,
                }
            }
            ParseOutcome::SyntaxError(info) => ValidationResult {
                valid: false,
                error_message: info.message,
                error_line: info.line,
                // the lexical detector still sees the raw text
                skill_assessment: SkillAssessment::with_errors(domain::is_domain_match(source)),
            },
            ParseOutcome::Fault(message) => ValidationResult {
                valid: false,
                error_message: message,
                error_line: -1,
                skill_assessment: SkillAssessment::with_errors(false),
            },
        }
    }

    /// Produce improvement suggestions for one submission.
    ///
    /// Meaningful only after [`validate`](Self::validate) reported the text
    /// as valid; for unparsable input the output degrades to style checks
    /// plus one informational entry.
    #[instrument(skip_all, fields(bytes = source.len()))]
    pub fn suggest(&self, source: &str) -> Vec<Suggestion> {
        suggest::suggest_improvements(source, &self.config.style)
    }

    /// Analyze a batch of named submissions under one shared version hint.
    ///
    /// Each submission is processed independently and in input order, with
    /// no state shared between analyses. Suggestions are generated only for
    /// submissions that parsed.
    pub fn analyze_batch(
        &self,
        submissions: &[Submission],
        version: PythonVersion,
    ) -> Vec<AnalysisReport> {
        submissions
            .iter()
            .map(|submission| self.analyze_one(submission, version))
            .collect()
    }

    fn analyze_one(&self, submission: &Submission, version: PythonVersion) -> AnalysisReport {
        let result = self.validate(&submission.source, version);
        let suggestions = if result.valid {
            self.suggest(&submission.source)
        } else {
            Vec::new()
        };
        AnalysisReport {
            filename: submission.filename.clone(),
            result,
            suggestions,
        }
    }
}
