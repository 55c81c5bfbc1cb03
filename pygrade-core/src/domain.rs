//! Lexical detector for the BMI-calculator exercise.
//!
//! Operates on a lower-cased copy of the raw text, never on the syntax
//! tree, so it can still rate submissions that fail to parse. The keyword
//! tables cover the exercise's Portuguese and English vocabulary plus the
//! formula written against either concrete variable names or generic terms.

use crate::types::DomainAnalysis;

/// Substrings identifying the exercise itself.
const DOMAIN_KEYWORDS: &[&str] = &[
    "imc",
    "índice de massa corporal",
    "indice de massa corporal",
    "massa corporal",
    "body mass index",
    "bmi",
    "peso / (altura",
    "peso/(altura",
    "peso/(altura * altura)",
    "peso / (altura * altura)",
    "peso/altura**2",
    "peso / altura**2",
    "weight / (height",
    "weight/(height",
];

/// Formula shapes accepted as a working calculation.
const FORMULA_PATTERNS: &[&str] = &[
    "peso / (altura",
    "peso/(altura",
    "peso / altura**2",
    "peso/altura**2",
    "peso / (altura * altura)",
    "peso/(altura*altura)",
    "weight / (height",
    "weight/(height",
    "imc = peso",
    "bmi = weight",
];

/// Category names and comparison shapes accepted as a classification step.
const CLASSIFICATION_KEYWORDS: &[&str] = &[
    "abaixo do peso",
    "peso normal",
    "sobrepeso",
    "obesidade",
    "underweight",
    "normal weight",
    "overweight",
    "obesity",
    "if imc <",
    "if imc >",
    "elif imc",
    "if bmi <",
    "if bmi >",
];

/// Whether the text looks like a BMI-calculator submission at all.
pub fn is_domain_match(source: &str) -> bool {
    let lower = source.to_lowercase();
    DOMAIN_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether the text carries a working calculation: a float conversion, one
/// of the formula shapes, and some way of showing the result.
pub fn has_functional_calculation(source: &str) -> bool {
    let lower = source.to_lowercase();

    let has_float_conversion = lower.contains("float");
    let has_calculation = FORMULA_PATTERNS.iter().any(|p| lower.contains(p));
    let has_output = lower.contains("print") || lower.contains("return");

    has_float_conversion && has_calculation && has_output
}

/// Whether the text carries a classification step.
///
/// Returns on the first classification keyword present, in table order,
/// with the value of the global conditional check. A keyword without a
/// conditional anywhere in the text therefore yields false immediately;
/// this short-circuit is pinned behavior, not an accident to fix.
pub fn has_classification(source: &str) -> bool {
    let lower = source.to_lowercase();

    let has_conditionals = lower.contains("if ") && lower.contains(':');

    for keyword in CLASSIFICATION_KEYWORDS {
        if lower.contains(keyword) {
            return has_conditionals;
        }
    }

    false
}

/// Run all three predicates and derive the domain level.
pub fn analyze(source: &str) -> DomainAnalysis {
    DomainAnalysis::from_flags(
        is_domain_match(source),
        has_functional_calculation(source),
        has_classification(source),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DomainLevel;

    const CRITICAL_SNIPPET: &str = "peso = float(input())\naltura = float(input())\nimc = peso / (altura * altura)\nprint(imc)";

    #[test]
    fn formula_with_variable_names_matches() {
        assert!(is_domain_match(CRITICAL_SNIPPET));
    }

    #[test]
    fn english_vocabulary_matches() {
        assert!(is_domain_match("bmi = weight / (height * height)"));
        assert!(is_domain_match("# Body Mass Index calculator"));
    }

    #[test]
    fn unrelated_code_does_not_match() {
        assert!(!is_domain_match("def soma(a, b):\n    return a + b"));
    }

    #[test]
    fn functional_calculation_needs_all_three_signals() {
        assert!(has_functional_calculation(CRITICAL_SNIPPET));
        // no float conversion
        assert!(!has_functional_calculation(
            "imc = peso / (altura * altura)\nprint(imc)"
        ));
        // no output
        assert!(!has_functional_calculation(
            "peso = float(input())\nimc = peso / (altura * altura)"
        ));
    }

    #[test]
    fn classification_needs_keyword_and_conditional() {
        let classified = "imc = peso / (altura * altura)\nif imc < 18.5:\n    print('abaixo do peso')";
        assert!(has_classification(classified));
        assert!(!has_classification(CRITICAL_SNIPPET));
    }

    #[test]
    fn classification_keyword_without_conditional_is_false() {
        // 'sobrepeso' appears but the text has no colon, so the conditional
        // check fails at the first keyword hit
        assert!(!has_classification("resultado = 'sobrepeso'"));
    }

    #[test]
    fn critical_snippet_rates_critical() {
        let analysis = analyze(CRITICAL_SNIPPET);
        assert!(analysis.is_domain_match);
        assert!(analysis.has_functional_calculation);
        assert!(!analysis.has_classification);
        assert_eq!(analysis.level, DomainLevel::Critical);
    }

    #[test]
    fn full_solution_rates_desirable() {
        let source = "peso = float(input())\naltura = float(input())\nimc = peso / (altura * altura)\nif imc < 18.5:\n    print('abaixo do peso')\nelse:\n    print(imc)";
        let analysis = analyze(source);
        assert_eq!(analysis.level, DomainLevel::Desirable);
    }

    #[test]
    fn detector_works_on_unparsable_text() {
        // broken syntax, but the lexical scan does not care
        assert!(is_domain_match("imc = peso / (altura *"));
    }
}
