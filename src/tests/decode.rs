#[cfg(test)]
mod tests {
    use crate::{
        assessment::models::{Question, QuestionError, QuestionView},
        client::{
            generator_client::{decode_questions, strip_code_fences},
            generator_error::GeneratorError,
        },
    };

    fn raw_question(answer: &str) -> serde_json::Value {
        serde_json::json!({
            "question": "Which practice builds soil organic matter fastest?",
            "options": ["Deep tillage", "Cover cropping", "Bare fallow", "Stubble burning"],
            "answer": answer,
            "hint": "Think about living roots."
        })
    }

    fn payload(count: usize) -> String {
        let items: Vec<_> = (0..count).map(|_| raw_question("Cover cropping")).collect();
        serde_json::to_string(&items).unwrap()
    }

    #[test]
    fn strips_fenced_code_blocks() {
        let fenced = format!("```json\n{}\n```", payload(5));
        assert_eq!(strip_code_fences(&fenced), payload(5));

        let bare = payload(5);
        assert_eq!(strip_code_fences(&bare), bare);
    }

    #[test]
    fn decodes_a_valid_fenced_payload() {
        let fenced = format!("```json\n{}\n```", payload(5));
        let questions = decode_questions(&fenced, 5).unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].answer(), "Cover cropping");
        assert_eq!(questions[0].options().len(), 4);
        assert_eq!(questions[0].hint(), "Think about living roots.");
    }

    #[test]
    fn rejects_text_that_is_not_json() {
        let result = decode_questions("Here are your questions!", 5);
        assert!(matches!(result, Err(GeneratorError::Malformed(_))));
    }

    #[test]
    fn rejects_the_wrong_question_count() {
        let result = decode_questions(&payload(3), 5);
        assert!(matches!(result, Err(GeneratorError::Malformed(_))));
    }

    #[test]
    fn rejects_an_answer_that_matches_no_option() {
        let items = vec![raw_question("No-till drilling")];
        let text = serde_json::to_string(&items).unwrap();
        let result = decode_questions(&text, 1);
        assert!(matches!(result, Err(GeneratorError::Malformed(_))));
    }

    #[test]
    fn question_validation_covers_every_invariant() {
        let options = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            Question::new(
                " ".into(),
                options(&["a", "b", "c", "d"]),
                "a".into(),
                "h".into()
            ),
            Err(QuestionError::EmptyText)
        );
        assert_eq!(
            Question::new(
                "q".into(),
                options(&["a", "b", "c"]),
                "a".into(),
                "h".into()
            ),
            Err(QuestionError::WrongOptionCount(3))
        );
        assert_eq!(
            Question::new(
                "q".into(),
                options(&["a", "b", "b", "d"]),
                "a".into(),
                "h".into()
            ),
            Err(QuestionError::BadOption("b".into()))
        );
        assert_eq!(
            Question::new(
                "q".into(),
                options(&["a", "b", "c", ""]),
                "a".into(),
                "h".into()
            ),
            Err(QuestionError::BadOption("".into()))
        );
        assert_eq!(
            Question::new(
                "q".into(),
                options(&["a", "b", "c", "d"]),
                "e".into(),
                "h".into()
            ),
            Err(QuestionError::UnknownAnswer("e".into()))
        );
        assert_eq!(
            Question::new(
                "q".into(),
                options(&["a", "b", "c", "d"]),
                "a".into(),
                "".into()
            ),
            Err(QuestionError::EmptyHint)
        );
        assert!(
            Question::new(
                "q".into(),
                options(&["a", "b", "c", "d"]),
                "a".into(),
                "h".into()
            )
            .is_ok()
        );
    }

    #[test]
    fn question_views_never_carry_the_answer() {
        let questions = decode_questions(&payload(1), 1).unwrap();
        let view = QuestionView::from_question(&questions[0], 0, 1);
        let value = serde_json::to_value(&view).unwrap();

        assert!(value.get("answer").is_none());
        assert_eq!(value["number"], 1);
        assert_eq!(value["total"], 1);
        assert_eq!(value["options"].as_array().unwrap().len(), 4);
    }
}
