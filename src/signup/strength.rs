//! Password strength meter shown under the sign-up password field. Purely
//! advisory: the score never blocks submission.

use regex::Regex;
use std::fmt;

/// Minimum length counted as a met criterion.
const MIN_LENGTH: usize = 6;

// ASCII classes only; any other character, accented letters included, is special.
const UPPERCASE: &str = "[A-Z]";
const LOWERCASE: &str = "[a-z]";
const DIGIT: &str = "[0-9]";
const SPECIAL: &str = "[^A-Za-z0-9]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Criterion {
    pub label: &'static str,
    pub met: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Good,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryWeak => "Very Weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub criteria: [Criterion; 5],
}

impl PasswordStrength {
    #[must_use]
    pub const fn level(&self) -> StrengthLevel {
        StrengthLevel::from_score(self.score)
    }
}

/// Scores a password from 0 to 4: one point each for length, mixed case,
/// a digit, and a symbol.
#[must_use]
pub fn evaluate(password: &str) -> PasswordStrength {
    let long_enough = password.chars().count() >= MIN_LENGTH;
    let has_upper = contains(password, UPPERCASE);
    let has_lower = contains(password, LOWERCASE);
    let has_digit = contains(password, DIGIT);
    let has_special = contains(password, SPECIAL);

    let score = [long_enough, has_upper && has_lower, has_digit, has_special]
        .into_iter()
        .map(u8::from)
        .sum();

    PasswordStrength {
        score,
        criteria: [
            Criterion {
                label: "At least 6 characters",
                met: long_enough,
            },
            Criterion {
                label: "Contains uppercase letter",
                met: has_upper,
            },
            Criterion {
                label: "Contains lowercase letter",
                met: has_lower,
            },
            Criterion {
                label: "Contains a number",
                met: has_digit,
            },
            Criterion {
                label: "Contains special character",
                met: has_special,
            },
        ],
    }
}

fn contains(password: &str, class: &str) -> bool {
    Regex::new(class).is_ok_and(|regex| regex.is_match(password))
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = usize::from(self.score);
        writeln!(
            formatter,
            "Password strength: {} [{}{}]",
            self.level().label(),
            "#".repeat(filled),
            "-".repeat(4 - filled.min(4))
        )?;
        for criterion in &self.criteria {
            let mark = if criterion.met { "x" } else { " " };
            writeln!(formatter, "  [{mark}] {}", criterion.label)?;
        }
        Ok(())
    }
}
