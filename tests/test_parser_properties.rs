//! Property tests for classifier reply parsing and label round-trips

use image_workflow::routing::parse_task_label;
use image_workflow::task::TaskLabel;
use proptest::prelude::*;

fn step_label() -> impl Strategy<Value = TaskLabel> {
    prop_oneof![
        Just(TaskLabel::ImageGeneration),
        Just(TaskLabel::TextOverlay),
        Just(TaskLabel::BackgroundRemoval),
    ]
}

proptest! {
    #[test]
    fn parse_never_panics(reply in ".*") {
        let _ = parse_task_label(&reply);
    }

    /// Text without underscores can never name a step
    #[test]
    fn reply_without_underscore_routes_to_end(reply in "[a-zA-Z0-9 .,!?]*") {
        prop_assert_eq!(parse_task_label(&reply), TaskLabel::End);
    }

    #[test]
    fn embedded_label_is_found(
        label in step_label(),
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z .]{0,20}",
        upper in any::<bool>(),
    ) {
        let name = if upper {
            label.as_str().to_uppercase()
        } else {
            label.as_str().to_string()
        };
        let reply = format!("{prefix}{name}{suffix}");
        prop_assert_eq!(parse_task_label(&reply), label);
    }

    /// image_generation beats text_overlay beats background_removal
    #[test]
    fn earlier_label_wins_regardless_of_position(a in step_label(), b in step_label()) {
        let reply = format!("{} then {}", b.as_str(), a.as_str());
        let expected = if TaskLabel::STEPS.iter().position(|l| *l == a)
            < TaskLabel::STEPS.iter().position(|l| *l == b)
        {
            a
        } else {
            b
        };
        prop_assert_eq!(parse_task_label(&reply), expected);
    }

    #[test]
    fn label_display_parses_back(label in prop_oneof![step_label(), Just(TaskLabel::End)]) {
        let parsed: TaskLabel = label.to_string().parse().unwrap();
        prop_assert_eq!(parsed, label);
    }
}
