//! OpenAI-compatible chat completions client.
//!
//! Works with any server exposing `POST {base_url}/v1/chat/completions`.
//! Replies are expected to contain a JSON object; everything else is
//! reported as [`CollaboratorError::Malformed`].

use async_trait::async_trait;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    extract_json_object, Advisor, DecomposeRequest, Grade, GradeRequest, Grader, Proposal,
    ProposedBlock,
};
use crate::{
    config::{parse_clock, CollaboratorConfig},
    error::CollaboratorError,
};

const SUPERVISOR_SYSTEM: &str = "You are a study supervisor: patient, practical and never \
glib. Make the learner's plan executable and verifiable. Prefer the smallest concrete action \
over general advice. Challenge gently when a report lacks evidence and ask for one to three \
verifiable items such as a commit, a screenshot, note excerpts or something they can explain \
back. If a plan is unrealistic, shrink the scope or add buffer instead of pushing harder. \
Always answer with a single JSON object and nothing else.";

const TEMPERATURE: f32 = 0.4;

/// Chat client for plan decomposition and check-in grading.
#[derive(Debug, Clone)]
pub struct OpenAiCollaborator {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlanReply {
    #[serde(default)]
    advice: Option<String>,
    #[serde(default)]
    days: Vec<DayReply>,
}

#[derive(Debug, Deserialize)]
struct DayReply {
    day: String,
    #[serde(default)]
    blocks: Vec<BlockReply>,
}

#[derive(Debug, Deserialize)]
struct BlockReply {
    start_time: String,
    end_time: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct GradeReply {
    verdict: String,
    feedback: String,
}

impl OpenAiCollaborator {
    /// Creates a client. A trailing slash on `base_url` is ignored.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from the `[collaborator]` configuration section.
    pub fn from_config(config: &CollaboratorConfig) -> Self {
        Self::new(&config.base_url, &config.api_key, &config.model)
    }

    /// Sends one system + user exchange and returns the reply text.
    async fn chat(&self, user: &str) -> Result<String, CollaboratorError> {
        if self.api_key.trim().is_empty() {
            return Err(CollaboratorError::NotConfigured);
        }

        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SUPERVISOR_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::Status(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CollaboratorError::Malformed("reply has no content".to_string()))
    }
}

fn decompose_prompt(request: &DecomposeRequest) -> String {
    let days = request
        .horizon
        .iter()
        .map(Date::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Learner goal: {goal}\n\
         First give short advice on making the goal realistic (shrink the scope, add buffer, \
         name verifiable milestones). Then give two or three task blocks for each of these days: \
         {days}.\n\
         Each block has start_time \"HH:MM\", end_time \"HH:MM\", a minimal actionable title and a \
         description stating how completion is verified.\n\
         Reply with strict JSON: {{\"advice\":\"...\",\"days\":[{{\"day\":\"YYYY-MM-DD\",\
         \"blocks\":[{{\"start_time\":\"HH:MM\",\"end_time\":\"HH:MM\",\"title\":\"...\",\
         \"description\":\"...\"}}]}}]}}",
        goal = request.goal,
    )
}

fn grade_prompt(request: &GradeRequest) -> String {
    let evidence = if request.evidence.is_empty() {
        "(none)".to_string()
    } else {
        request.evidence.join("; ")
    };
    format!(
        "Goal: {goal}\n\
         Task: {title}\n\
         Acceptance criteria: {description}\n\
         Learner report: {report}\n\
         Evidence: {evidence}\n\
         Decide whether the report is credible. Give sincere, specific feedback; if evidence is \
         missing ask for one to three verifiable items; if progress is short, suggest the smallest \
         catch-up action. Keep feedback under 250 words.\n\
         Reply with strict JSON: {{\"verdict\":\"accepted\" or \"challenged_needs_evidence\",\
         \"feedback\":\"...\"}}",
        goal = request.goal,
        title = request.block_title,
        description = request.block_description,
        report = request.report,
    )
}

/// Maps a decoded plan reply onto proposed blocks. Any unparseable day or
/// clock time makes the whole reply malformed.
fn proposal_from_value(value: Value) -> Result<Proposal, CollaboratorError> {
    let reply: PlanReply =
        serde_json::from_value(value).map_err(|e| CollaboratorError::Malformed(e.to_string()))?;

    let mut blocks = Vec::new();
    for day in reply.days {
        let date: Date = day
            .day
            .trim()
            .parse()
            .map_err(|e| CollaboratorError::Malformed(format!("day '{}': {e}", day.day)))?;
        for block in day.blocks {
            let start = parse_clock(&block.start_time)
                .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
            let end = parse_clock(&block.end_time)
                .map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
            blocks.push(ProposedBlock {
                day: date,
                start,
                end,
                title: block.title.trim().to_string(),
                description: block.description.trim().to_string(),
            });
        }
    }

    Ok(Proposal {
        advice: reply
            .advice
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()),
        blocks,
    })
}

fn grade_from_value(value: Value) -> Result<Grade, CollaboratorError> {
    let reply: GradeReply =
        serde_json::from_value(value).map_err(|e| CollaboratorError::Malformed(e.to_string()))?;
    let verdict = reply
        .verdict
        .parse()
        .map_err(|_| CollaboratorError::Malformed(format!("unknown verdict '{}'", reply.verdict)))?;
    let feedback = reply.feedback.trim().to_string();
    if feedback.is_empty() {
        return Err(CollaboratorError::Malformed("empty feedback".to_string()));
    }
    Ok(Grade { verdict, feedback })
}

#[async_trait]
impl Advisor for OpenAiCollaborator {
    async fn decompose(&self, request: &DecomposeRequest) -> Result<Proposal, CollaboratorError> {
        let text = self.chat(&decompose_prompt(request)).await?;
        let value = extract_json_object(&text)
            .ok_or_else(|| CollaboratorError::Malformed("no JSON object in reply".to_string()))?;
        proposal_from_value(value)
    }
}

#[async_trait]
impl Grader for OpenAiCollaborator {
    async fn grade(&self, request: &GradeRequest) -> Result<Grade, CollaboratorError> {
        let text = self.chat(&grade_prompt(request)).await?;
        let value = extract_json_object(&text)
            .ok_or_else(|| CollaboratorError::Malformed("no JSON object in reply".to_string()))?;
        grade_from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::{date, time};
    use serde_json::json;

    use super::*;
    use crate::models::Verdict;

    #[test]
    fn test_proposal_from_reply() {
        let proposal = proposal_from_value(json!({
            "advice": "  Cut the scope to one framework. ",
            "days": [{
                "day": "2026-03-02",
                "blocks": [
                    {"start_time": "19:00", "end_time": "19:45", "title": "Routing", "description": "Commit a working route"},
                    {"start_time": "20:00", "end_time": "20:30", "title": "Notes", "description": "Three bullet points"}
                ]
            }]
        }))
        .unwrap();

        assert_eq!(proposal.advice.as_deref(), Some("Cut the scope to one framework."));
        assert_eq!(proposal.blocks.len(), 2);
        assert_eq!(proposal.blocks[0].day, date(2026, 3, 2));
        assert_eq!(proposal.blocks[0].start, time(19, 0, 0, 0));
        assert_eq!(proposal.blocks[1].end, time(20, 30, 0, 0));
    }

    #[test]
    fn test_proposal_with_bad_clock_is_malformed() {
        let result = proposal_from_value(json!({
            "days": [{"day": "2026-03-02", "blocks": [
                {"start_time": "7pm", "end_time": "20:00", "title": "x", "description": "y"}
            ]}]
        }));
        assert!(matches!(result, Err(CollaboratorError::Malformed(_))));
    }

    #[test]
    fn test_grade_from_reply() {
        let grade = grade_from_value(json!({
            "verdict": "challenged_needs_evidence",
            "feedback": "Show me the commit."
        }))
        .unwrap();
        assert_eq!(grade.verdict, Verdict::ChallengedNeedsEvidence);
        assert_eq!(grade.feedback, "Show me the commit.");

        assert!(matches!(
            grade_from_value(json!({"verdict": "maybe", "feedback": "hm"})),
            Err(CollaboratorError::Malformed(_))
        ));
        assert!(matches!(
            grade_from_value(json!({"verdict": "accepted", "feedback": "  "})),
            Err(CollaboratorError::Malformed(_))
        ));
    }

    #[test]
    fn test_prompts_mention_inputs() {
        let prompt = decompose_prompt(&DecomposeRequest {
            goal: "Learn Rust".to_string(),
            horizon: vec![date(2026, 3, 2), date(2026, 3, 3)],
        });
        assert!(prompt.contains("Learn Rust"));
        assert!(prompt.contains("2026-03-02, 2026-03-03"));

        let prompt = grade_prompt(&GradeRequest {
            goal: "Learn Rust".to_string(),
            block_title: "Ownership".to_string(),
            block_description: "Explain borrowing".to_string(),
            report: "Read chapter 4".to_string(),
            evidence: vec![],
        });
        assert!(prompt.contains("Evidence: (none)"));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = OpenAiCollaborator::new("http://127.0.0.1:9", "", "gpt-4o-mini");
        let request = GradeRequest {
            goal: String::new(),
            block_title: String::new(),
            block_description: String::new(),
            report: "done".to_string(),
            evidence: vec![],
        };
        assert_eq!(
            client.grade(&request).await,
            Err(CollaboratorError::NotConfigured)
        );
    }
}
