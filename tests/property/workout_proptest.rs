//! Property-based tests for workout drafts

use liftlog::shared::TemplateDraft;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_template_draft_is_trimmed(
        name in "[ ]{0,3}[A-Za-z][A-Za-z ]{0,20}[ ]{0,3}",
        exercises in prop::collection::vec("[ ]{0,2}[A-Za-z]{0,10}[ ]{0,2}", 0..8),
    ) {
        match TemplateDraft::new(&name, &exercises) {
            Ok(draft) => {
                prop_assert_eq!(draft.name.as_str(), name.trim());
                prop_assert!(!draft.exercises.is_empty());
                prop_assert!(draft.exercises.iter().all(|e| !e.is_empty() && e.trim() == e));
                let expected: Vec<&str> = exercises
                    .iter()
                    .map(|e| e.trim())
                    .filter(|e| !e.is_empty())
                    .collect();
                let kept: Vec<&str> = draft.exercises.iter().map(String::as_str).collect();
                prop_assert_eq!(kept, expected);
            }
            Err(_) => {
                prop_assert!(exercises.iter().all(|e| e.trim().is_empty()));
            }
        }
    }
}
