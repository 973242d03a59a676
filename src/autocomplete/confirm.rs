use super::filter::filter_options;

/// Confirmation state for a value that matches no option.
///
/// Created when a field that accepts custom values is blurred with
/// unrecognized text. Holds the trimmed text and the closest options,
/// offered as one-step replacements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomValuePrompt {
    pending: String,
    suggestions: Vec<String>,
}

impl CustomValuePrompt {
    pub fn new<S: AsRef<str>>(pending: &str, options: &[S], max_suggestions: usize) -> Self {
        let suggestions = filter_options(pending, options)
            .into_iter()
            .take(max_suggestions)
            .map(str::to_owned)
            .collect();
        CustomValuePrompt {
            pending: pending.to_string(),
            suggestions,
        }
    }

    /// The unrecognized text, already trimmed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestion(&self, index: usize) -> Option<&str> {
        self.suggestions.get(index).map(String::as_str)
    }

    pub fn message(&self) -> String {
        format!("\"{}\" is not in the predefined options.", self.pending)
    }

    pub fn confirm_label(&self) -> String {
        format!("Use \"{}\" as Other", self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suggestions_are_capped() {
        let options = ["Stand A", "Stand B", "Stand C", "Stand D"];
        let prompt = CustomValuePrompt::new("stand", &options, 3);
        assert_eq!(prompt.suggestions(), &["Stand A", "Stand B", "Stand C"]);
        assert_eq!(prompt.suggestion(2), Some("Stand C"));
        assert_eq!(prompt.suggestion(3), None);
    }

    #[test]
    fn no_near_match_means_no_suggestions() {
        let prompt = CustomValuePrompt::new("CUSTOM", &["WS", "MID"], 3);
        assert!(prompt.suggestions().is_empty());
        assert!(prompt.message().contains("CUSTOM"));
        assert_eq!(prompt.confirm_label(), "Use \"CUSTOM\" as Other");
    }
}
