//! Predefined security questions.
//!
//! The request layer offers these when an account is created; registration
//! itself accepts any non-empty question.

/// The predefined security questions.
pub const QUESTIONS: &[&str] = &[
    "What is your mother's maiden name?",
    "What was the name of your first pet?",
    "What is your city of birth?",
    "What was the name of your primary school?",
    "What is the first name of your childhood best friend?",
];
