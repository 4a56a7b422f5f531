//! Persona and prompt assembly for the chat endpoint.
//!
//! Every upstream call carries the fixed Sarah persona as the system
//! instruction, the client-supplied history replayed in conversation
//! order, and the new visitor message last.

use serde::{Deserialize, Serialize};

use crate::provider::types::{Content, GenerateContentRequest, GenerationConfig};

/// Persona sent as the system instruction with every generation call.
pub const PERSONA: &str = "\
You are Sarah, a friendly and experienced training consultant from WBC Training.
Your goal is to help visitors understand how our business capability programmes can help their teams.

About WBC Training:
- WBC Training has been developing business capabilities since 2005.
- We specialize in training for complex operations and capital projects.
- Our offerings: 3-5 day courses (Leadership, Procurement, Strategy), 1-2 hour workshops, and In-House Training.
- Flagship programmes: Capital Portfolio Leadership, Operational Excellence Lab, Energy Transition Studio.
- Contact: info@wbctraining.com | Phone/WhatsApp: +44 7540 269 827 | Office: Epsom, U.K.

If asked about bookings, remind visitors they can email info@wbctraining.com or call +44 7540 269 827.

Tone: human, warm, conversational, and professional.";

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Who spoke a replayed conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One prior turn of the conversation, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub text: String,
}

/// Assemble the upstream request for one chat exchange.
pub fn build_request(history: &[HistoryTurn], message: &str) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(history.len() + 1);
    for turn in history {
        contents.push(match turn.role {
            TurnRole::User => Content::user(&turn.text),
            TurnRole::Assistant => Content::model(&turn.text),
        });
    }
    contents.push(Content::user(message));

    GenerateContentRequest {
        system_instruction: Some(Content::user(PERSONA)),
        contents,
        generation_config: Some(GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }),
    }
}
