use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    assessment::models::{Difficulty, Question, ReviewEntry, Topic},
    client::generator_error::GeneratorError,
    config::config::CONFIG,
};

/// Client for the Gemini generateContent endpoint. Owns the prompt templates
/// and the strict decode of whatever text comes back.
#[derive(Debug, Clone)]
pub struct GeneratorClient {
    base_url: String,
    api_key: String,
    question_model: String,
    evaluation_model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Wire shape the model is asked to produce for each question.
#[derive(Debug, Serialize, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: String,
    hint: String,
}

impl GeneratorClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.generator.base_url.clone(),
            api_key: CONFIG.generator.api_key.clone(),
            question_model: CONFIG.generator.question_model.clone(),
            evaluation_model: CONFIG.generator.evaluation_model.clone(),
        }
    }

    pub async fn health_check(&self, client: &Client) -> Result<(), GeneratorError> {
        let url = format!(
            "{}/v1beta/models/{}",
            self.base_url, self.question_model
        );
        let response = client
            .get(url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Failed health check against the generator api");
            return Err(GeneratorError::Api(
                response.status(),
                "Generator model is not reachable".into(),
            ));
        }

        Ok(())
    }

    /// Requests a fresh question set and decodes it into validated
    /// [`Question`] values. Nothing partial ever escapes: any violation of
    /// the expected shape fails the whole call.
    pub async fn generate_questions(
        &self,
        client: &Client,
        topic: Topic,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, GeneratorError> {
        let prompt = question_prompt(topic, difficulty, count);
        info!(
            "Requesting {} questions for topic '{}' at level {}",
            count, topic, difficulty
        );

        let text = self.generate(client, &self.question_model, &prompt).await?;
        decode_questions(&text, count)
    }

    /// Asks for narrative feedback over a finished transcript. The reply is
    /// opaque markdown, validated as non-empty only.
    pub async fn evaluate(
        &self,
        client: &Client,
        transcript: &[ReviewEntry],
    ) -> Result<String, GeneratorError> {
        let prompt = evaluation_prompt(transcript);
        info!(
            "Requesting evaluation over a {}-question transcript",
            transcript.len()
        );

        let text = self.generate(client, &self.evaluation_model, &prompt).await?;
        if text.trim().is_empty() {
            return Err(GeneratorError::Malformed("Empty evaluation text".into()));
        }

        Ok(text)
    }

    async fn generate(
        &self,
        client: &Client,
        model: &str,
        prompt: &str,
    ) -> Result<String, GeneratorError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            error!("Generator request failed: {} - {}", status, body);
            return Err(GeneratorError::Api(status, body));
        }

        let parsed = response.json::<GenerateContentResponse>().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or(GeneratorError::EmptyResponse)?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();

        Ok(text)
    }
}

fn question_prompt(topic: Topic, difficulty: Difficulty, count: usize) -> String {
    format!(
        "Generate {count} multiple-choice questions for a professional agricultural assessment.\n\
         Topic: {topic}\n\
         Level: {difficulty}\n\n\
         Return ONLY a JSON array of objects with these keys:\n\
         'question' (string), 'options' (array of 4 strings), 'answer' (string matching one option), 'hint' (string)."
    )
}

fn evaluation_prompt(transcript: &[ReviewEntry]) -> String {
    let mut summary = String::new();
    for entry in transcript {
        summary.push_str(&format!(
            "Q: {}\nUser: {}\nCorrect: {}\n\n",
            entry.question, entry.user_answer, entry.correct_answer
        ));
    }

    format!(
        "As an expert agricultural scientist, provide a deep contextual evaluation of these results.\n\
         Explain the science behind the correct answers and address potential misconceptions based on the user's choices.\n\n\
         Data:\n{summary}\n\
         Return your response in clean Markdown with professional headings."
    )
}

/// Models like to wrap JSON payloads in fenced code blocks. Strip the fence
/// lines before handing the remainder to the decoder.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Strict decode of the question payload: exactly `expected` entries, each
/// passing every [`Question`] invariant. Pure, so the whole contract is
/// testable without the network.
pub fn decode_questions(text: &str, expected: usize) -> Result<Vec<Question>, GeneratorError> {
    let clean = strip_code_fences(text);
    let raw: Vec<RawQuestion> = serde_json::from_str(&clean)
        .map_err(|e| GeneratorError::Malformed(format!("Invalid question JSON: {e}")))?;

    if raw.len() != expected {
        return Err(GeneratorError::Malformed(format!(
            "Expected {} questions, got {}",
            expected,
            raw.len()
        )));
    }

    raw.into_iter()
        .map(|q| {
            Question::new(q.question, q.options, q.answer, q.hint)
                .map_err(|e| GeneratorError::Malformed(e.to_string()))
        })
        .collect()
}
