//! Input port used to ask the user for a new name.

/// Message shown when asking for a new family member.
pub const MEMBER_NAME_PROMPT: &str = "Enter family member name:";

/// Message shown when asking for a new medicine.
pub const MEDICINE_NAME_PROMPT: &str = "Enter medicine name:";

/// Blocking "ask for a string" capability.
///
/// `None` means the user cancelled. Callers treat `None` and `Some("")`
/// the same way: the operation is abandoned.
pub trait NamePrompt {
    fn request_name(&mut self, message: &str) -> Option<String>;
}

impl<F> NamePrompt for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn request_name(&mut self, message: &str) -> Option<String> {
        self(message)
    }
}

/// Asks `prompt` and keeps only non-empty answers.
pub(crate) fn ask_non_empty(
    prompt: &mut (impl NamePrompt + ?Sized),
    message: &str,
) -> Option<String> {
    prompt.request_name(message).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{ask_non_empty, NamePrompt};

    #[test]
    fn closures_act_as_prompts_and_see_the_message() {
        let mut seen = Vec::new();
        let mut prompt = |message: &str| -> Option<String> {
            seen.push(message.to_string());
            Some("Asha".to_string())
        };
        assert_eq!(prompt.request_name("who?").as_deref(), Some("Asha"));
        assert_eq!(seen, vec!["who?"]);
    }

    #[test]
    fn empty_and_cancelled_answers_are_dropped() {
        let mut cancelled = |_: &str| -> Option<String> { None };
        let mut empty = |_: &str| -> Option<String> { Some(String::new()) };
        let mut blank = |_: &str| -> Option<String> { Some(" ".to_string()) };

        assert_eq!(ask_non_empty(&mut cancelled, "x"), None);
        assert_eq!(ask_non_empty(&mut empty, "x"), None);
        assert_eq!(ask_non_empty(&mut blank, "x").as_deref(), Some(" "));
    }
}
