#[cfg(test)]
mod tests {
    use crate::{
        assessment::{
            models::{Difficulty, Topic},
            registry::SessionRegistry,
            session::{Phase, SessionError},
        },
        client::generator_client::decode_questions,
    };

    // A full generator payload the way Gemini tends to return it, fences
    // included.
    const GENERATED: &str = r#"```json
[
  {"question": "Which indicator best reflects soil biological activity?",
   "options": ["Bulk density", "Earthworm count", "Slope gradient", "Field color"],
   "answer": "Earthworm count",
   "hint": "Look for living organisms."},
  {"question": "What is the primary goal of cover cropping?",
   "options": ["Weed aesthetics", "Soil cover and organic matter", "Faster harvest", "Lower seed cost"],
   "answer": "Soil cover and organic matter",
   "hint": "Keep the soil protected."},
  {"question": "Which nutrient is most mobile in soil water?",
   "options": ["Phosphorus", "Potassium", "Nitrate nitrogen", "Calcium"],
   "answer": "Nitrate nitrogen",
   "hint": "It leaches easily."},
  {"question": "What does a low C:N ratio residue do?",
   "options": ["Decomposes quickly", "Decomposes slowly", "Never decomposes", "Acidifies permanently"],
   "answer": "Decomposes quickly",
   "hint": "Microbes love nitrogen-rich material."},
  {"question": "Which practice most reduces wind erosion?",
   "options": ["Bare fallow", "Residue retention", "Deep ripping", "Night irrigation"],
   "answer": "Residue retention",
   "hint": "Cover breaks the wind at the surface."}
]
```"#;

    #[test]
    fn full_assessment_round_trip() {
        let registry = SessionRegistry::new();
        let id = registry.create();

        // Setup -> InProgress with a freshly decoded question set.
        let questions = decode_questions(GENERATED, 5).unwrap();
        registry
            .with_session(&id, |session| {
                session.start(Topic::SoilHealth, Difficulty::Intermediate, questions)
            })
            .unwrap()
            .unwrap();

        // Correct on questions 1, 2 and 4, wrong on 3 and 5.
        let choices = [
            "Earthworm count",
            "Soil cover and organic matter",
            "Phosphorus",
            "Decomposes quickly",
            "Bare fallow",
        ];
        for choice in choices {
            registry
                .with_session(&id, |session| session.submit_answer(choice))
                .unwrap()
                .unwrap();
        }

        let (phase, scorecard, review) = registry
            .with_session(&id, |session| {
                (
                    session.phase(),
                    session.score().unwrap(),
                    session.review().unwrap(),
                )
            })
            .unwrap();

        assert_eq!(phase, Phase::Completed);
        assert_eq!(scorecard.correct, 3);
        assert_eq!(scorecard.total, 5);
        assert_eq!(scorecard.percentage, 60.0);

        assert_eq!(review.len(), 5);
        assert!(review[0].correct && review[1].correct && review[3].correct);
        assert!(!review[2].correct && !review[4].correct);
        assert_eq!(review[2].correct_answer, "Nitrate nitrogen");

        // Evaluation is cached once, a rerun may not overwrite it.
        registry
            .with_session(&id, |session| {
                session.set_evaluation("Strong on fundamentals, review nutrient mobility.".into())
            })
            .unwrap()
            .unwrap();
        let second = registry
            .with_session(&id, |session| session.set_evaluation("Other text".into()))
            .unwrap();
        assert_eq!(second, Err(SessionError::EvaluationAlreadySet));

        // Reset leaves a session ready for a brand-new topic.
        registry.with_session(&id, |session| session.reset()).unwrap();
        let (phase, evaluation) = registry
            .with_session(&id, |session| {
                (session.phase(), session.evaluation().map(str::to_string))
            })
            .unwrap();
        assert_eq!(phase, Phase::Setup);
        assert_eq!(evaluation, None);
    }

    #[test]
    fn a_failed_generation_never_starts_the_session() {
        let registry = SessionRegistry::new();
        let id = registry.create();

        // Malformed output is rejected before any session mutation happens.
        let result = decode_questions("```json\nnot even close\n```", 5);
        assert!(result.is_err());

        let phase = registry.with_session(&id, |session| session.phase()).unwrap();
        assert_eq!(phase, Phase::Setup);
    }
}
