use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Typed ID wrappers ──────────────────────────────────────────────

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

typed_id!(AnalysisId);

// ── Version hint ───────────────────────────────────────────────────

/// Python dialect hint supplied with a submission.
///
/// Selects parser leniency only; the output schema never changes with it.
/// The tree-sitter grammar tolerates both dialect families, so in practice
/// the hint flows into logs and persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PythonVersion {
    Py2,
    #[default]
    Py3,
}

impl PythonVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Py2 => "2",
            Self::Py3 => "3",
        }
    }
}

impl FromStr for PythonVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "2" => Ok(Self::Py2),
            "3" | "" => Ok(Self::Py3),
            other => Err(format!("unknown python version: {other}")),
        }
    }
}

// ── Skill levels ───────────────────────────────────────────────────

/// Discrete label summarizing code complexity/quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    /// No meaningful code submitted.
    Empty,
    /// Code contains syntax errors (or is a failed domain attempt).
    WithErrors,
    Beginner,
    Intermediate,
    Advanced,
    /// Domain exercise with a working calculation but no classification.
    Critical,
    /// Domain exercise meeting all criteria.
    Desirable,
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::WithErrors => "with_errors",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Critical => "critical",
            Self::Desirable => "desirable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "empty" => Some(Self::Empty),
            "with_errors" => Some(Self::WithErrors),
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "critical" => Some(Self::Critical),
            "desirable" => Some(Self::Desirable),
            _ => None,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Feature counts ─────────────────────────────────────────────────

/// Per-category tally of structural constructs found in one tree traversal.
///
/// The key set is closed; counts start at zero and only increase during a
/// single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureCounts {
    pub functions: u32,
    pub classes: u32,
    pub imports: u32,
    pub comprehensions: u32,
    pub error_handling: u32,
    pub advanced_types: u32,
    pub docstrings: u32,
    pub decorators: u32,
    pub complex_structures: u32,
    pub advanced_features: u32,
}

// ── Domain analysis ────────────────────────────────────────────────

/// Rating of a submission against the BMI-exercise criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DomainLevel {
    #[default]
    DoesNotMeetCriteria,
    Critical,
    Desirable,
}

impl DomainLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DoesNotMeetCriteria => "does_not_meet_criteria",
            Self::Critical => "critical",
            Self::Desirable => "desirable",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "does_not_meet_criteria" => Some(Self::DoesNotMeetCriteria),
            "critical" => Some(Self::Critical),
            "desirable" => Some(Self::Desirable),
            _ => None,
        }
    }
}

impl std::fmt::Display for DomainLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the lexical BMI-calculator detector.
///
/// Derived purely from the raw text, independent of parse success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainAnalysis {
    pub is_domain_match: bool,
    pub has_functional_calculation: bool,
    pub has_classification: bool,
    pub level: DomainLevel,
}

impl DomainAnalysis {
    /// Derive the domain level from the detector flags.
    ///
    /// `Desirable` requires both sub-criteria; `Critical` requires only the
    /// calculation; anything else does not meet the criteria.
    pub fn from_flags(
        is_domain_match: bool,
        has_functional_calculation: bool,
        has_classification: bool,
    ) -> Self {
        let level = if is_domain_match && has_functional_calculation && has_classification {
            DomainLevel::Desirable
        } else if is_domain_match && has_functional_calculation {
            DomainLevel::Critical
        } else {
            DomainLevel::DoesNotMeetCriteria
        };
        Self {
            is_domain_match,
            has_functional_calculation,
            has_classification,
            level,
        }
    }
}

// ── Skill assessment ───────────────────────────────────────────────

/// Skill label, fixed-scale score, feature counts, and domain rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub level: SkillLevel,
    /// Always one of {0, 25, 50, 75, 100}.
    pub score: u8,
    pub features: FeatureCounts,
    pub domain_analysis: DomainAnalysis,
}

impl SkillAssessment {
    /// Assessment for empty/whitespace-only input.
    pub fn empty() -> Self {
        Self {
            level: SkillLevel::Empty,
            score: 0,
            features: FeatureCounts::default(),
            domain_analysis: DomainAnalysis::default(),
        }
    }

    /// Assessment for a submission with syntax errors. The domain match flag
    /// is still evaluated over the raw text; the sub-criteria are not.
    pub fn with_errors(is_domain_match: bool) -> Self {
        Self {
            level: SkillLevel::WithErrors,
            score: 25,
            features: FeatureCounts::default(),
            domain_analysis: DomainAnalysis::from_flags(is_domain_match, false, false),
        }
    }
}

// ── Validation result ──────────────────────────────────────────────

/// Final artifact of one analysis: validity, error info, and assessment.
///
/// Created once per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub error_message: String,
    /// 1-based line of the syntax error, or -1 when not applicable.
    pub error_line: i64,
    pub skill_assessment: SkillAssessment,
}

/// Fixed message for empty/whitespace-only submissions.
pub const EMPTY_CODE_MESSAGE: &str = "The submitted code is empty.";

impl ValidationResult {
    pub fn empty() -> Self {
        Self {
            valid: false,
            error_message: EMPTY_CODE_MESSAGE.to_string(),
            error_line: -1,
            skill_assessment: SkillAssessment::empty(),
        }
    }
}

// ── Suggestions ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Style,
    Documentation,
    Warning,
    Info,
}

impl SuggestionCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Style => "style",
            Self::Documentation => "documentation",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// Advisory finding attached to a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub line: usize,
    pub message: String,
    pub category: SuggestionCategory,
}

// ── Submissions and reports ────────────────────────────────────────

/// A named source blob handed to the pipeline (file upload or snippet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub filename: String,
    pub source: String,
}

/// One submission's full output: validation plus suggestions.
///
/// Suggestions are populated only when the submission parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    #[serde(flatten)]
    pub result: ValidationResult,
    pub suggestions: Vec<Suggestion>,
}

// ── Persistence record ─────────────────────────────────────────────

/// Row shape of the `analyses` table: one record per analysis that carried
/// a skill assessment (which is every completed analysis).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub filename: String,
    pub code_content: String,
    pub is_valid: bool,
    pub error_message: String,
    pub error_line: i64,
    pub skill_level: SkillLevel,
    pub skill_score: u8,
    pub is_domain_match: bool,
    pub has_calculation: bool,
    pub has_classification: bool,
    pub domain_level: DomainLevel,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Build a record from a completed analysis. The id is assigned on save.
    pub fn from_result(filename: &str, source: &str, result: &ValidationResult) -> Self {
        let skill = &result.skill_assessment;
        Self {
            id: AnalysisId(0),
            filename: filename.to_string(),
            code_content: source.to_string(),
            is_valid: result.valid,
            error_message: result.error_message.clone(),
            error_line: result.error_line,
            skill_level: skill.level,
            skill_score: skill.score,
            is_domain_match: skill.domain_analysis.is_domain_match,
            has_calculation: skill.domain_analysis.has_functional_calculation,
            has_classification: skill.domain_analysis.has_classification,
            domain_level: skill.domain_analysis.level,
            created_at: Utc::now(),
        }
    }
}
