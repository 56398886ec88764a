//! Chat-completions request and response bodies

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart<'a> {
    ImageUrl { image_url: ImageUrl },
    Text { text: &'a str },
}

#[derive(Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

impl<'a> ChatRequest<'a> {
    /// One user message: the screenshot first, then the instruction
    pub fn with_image(model: &'a str, prompt: &'a str, image_b64: &str) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/png;base64,{image_b64}"),
                        },
                    },
                    ContentPart::Text { text: prompt },
                ],
            }],
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Deserialize)]
pub(crate) struct Message {
    pub content: String,
}

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: Option<String>,
}
