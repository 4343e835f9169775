//! A minimal client for the Google Gemini `generateContent` REST API.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::Error;

const BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MODEL: &str = "gemini-2.5-flash";

const ADVISOR_INSTRUCTION: &str = "\
You are a friendly, expert financial advisor AI assistant. Your role is to \
provide personalized, actionable financial advice.

Guidelines:
- Be encouraging and supportive, not judgmental
- Provide specific, actionable advice
- Use simple language, avoid jargon
- Suggest realistic steps they can take today
- Be concise but thorough

Format your response with:
- A direct answer to their question
- 2-3 actionable tips
- A motivational note when appropriate";

const ANALYZE_INSTRUCTION: &str = "\
You are a financial advisor AI that analyzes expenses and categorizes them \
as \"Need\" or \"Want\".

A \"Need\" is an essential expense required for survival, safety, or basic \
functioning: housing, food and groceries, healthcare, transportation to \
work, basic clothing, insurance, debt payments.

A \"Want\" is a non-essential expense that improves quality of life but \
isn't necessary: entertainment, dining out, luxury items, vacations, premium \
services, hobbies.

Respond ONLY with valid JSON in this exact format:
{
  \"category\": \"Need\" or \"Want\",
  \"confidence\": 0-100,
  \"reasoning\": \"Brief explanation\",
  \"tips\": [\"Tip 1\", \"Tip 2\"]
}";

/// The result of asking the AI whether an expense is a need or a want.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAnalysis {
    /// Either `"Need"` or `"Want"`, or `"Unknown"` if the AI response could
    /// not be parsed.
    pub category: String,
    /// How confident the AI is in the category, from 0 to 100.
    pub confidence: u8,
    /// A brief explanation of the category.
    pub reasoning: String,
    /// Suggestions for handling the expense.
    #[serde(default)]
    pub tips: Vec<String>,
}

/// A client for the Google Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    /// Create a client that authenticates with `api_key`.
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Ask the AI for financial advice in response to `query`.
    ///
    /// # Errors
    /// This function will return a [Error::AiService] if the request fails or
    /// the response has an unexpected shape.
    pub async fn smart_advice(&self, query: &str) -> Result<String, Error> {
        self.generate_content(ADVISOR_INSTRUCTION, query).await
    }

    /// Ask the AI whether an expense is a need or a want.
    ///
    /// A response that does not contain valid JSON is not an error: the raw
    /// text is returned as the reasoning of an `"Unknown"` analysis.
    ///
    /// # Errors
    /// This function will return a [Error::AiService] if the request fails.
    pub async fn analyze_expense(
        &self,
        expense: &str,
        amount: f64,
        description: Option<&str>,
    ) -> Result<ExpenseAnalysis, Error> {
        let message = format!(
            "Analyze this expense:\nItem: {expense}\nAmount: ${amount:.2}\n\
             Additional context: {}\n\nRespond with ONLY the JSON object, no other text.",
            description.unwrap_or("None provided")
        );

        let text = self.generate_content(ANALYZE_INSTRUCTION, &message).await?;

        Ok(parse_analysis(&text))
    }

    async fn generate_content(&self, instruction: &str, message: &str) -> Result<String, Error> {
        let url = format!(
            "{BASE_URL}/v1beta/models/{MODEL}:generateContent?key={}",
            self.api_key
        );

        let body = json!({
            "system_instruction": { "parts": [{ "text": instruction }] },
            "contents": [{ "parts": [{ "text": message }] }],
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|error| Error::AiService(error.to_string()))?
            .error_for_status()
            .map_err(|error| Error::AiService(error.to_string()))?;

        let response: Value = response
            .json()
            .await
            .map_err(|error| Error::AiService(error.to_string()))?;

        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| Error::AiService("the response contained no text".to_string()))
    }
}

/// Extract an [ExpenseAnalysis] from the AI response text.
///
/// The AI sometimes wraps the JSON in prose or a markdown code fence, so
/// everything between the first `{` and the last `}` is parsed. Text without
/// parseable JSON falls back to an `"Unknown"` analysis that carries the raw
/// text as its reasoning.
fn parse_analysis(text: &str) -> ExpenseAnalysis {
    let json_slice = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => "",
    };

    serde_json::from_str(json_slice).unwrap_or_else(|_| ExpenseAnalysis {
        category: "Unknown".to_string(),
        confidence: 50,
        reasoning: text.to_string(),
        tips: Vec::new(),
    })
}
