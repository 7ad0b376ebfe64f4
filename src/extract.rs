use serde::Deserialize;

const TEXT_MARKER: &str = "\"text\":\"";

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,

    // Only reported by some model versions
    model_version: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,

    // Ex: 'STOP' | 'MAX_TOKENS' | 'SAFETY'
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize, Clone)]
struct Part {
    text: Option<String>,
}

/// Pulls the generated text out of a raw `generateContent` response body.
///
/// The body is decoded as JSON first and the first text part of the first
/// candidate that has one is returned. If that fails, the first `"text":"`
/// marker is located and the characters up to its closing quote are taken,
/// with `\n` and `\"` unescaped. When neither works, `raw` is returned
/// unchanged so the caller still has something to show.
pub fn extract_text(raw: &str) -> String {
    if let Some(text) = decode_first_text(raw) {
        tracing::debug!("extracted text from decoded response");
        return text;
    }

    match marker_text(raw) {
        Some(text) => {
            tracing::debug!("extracted text by marker search");
            text
        }
        None => {
            tracing::warn!("no text found in response, showing the raw body");
            raw.to_string()
        }
    }
}

fn decode_first_text(raw: &str) -> Option<String> {
    let response: GenerateContentResponse = serde_json::from_str(raw).ok()?;
    if let Some(model) = &response.model_version {
        tracing::debug!(model = %model, "response model");
    }

    response.candidates.into_iter().find_map(|candidate| {
        if let Some(reason) = &candidate.finish_reason {
            tracing::debug!(finish_reason = %reason, "candidate finished");
        }
        candidate
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
    })
}

fn marker_text(raw: &str) -> Option<String> {
    let start = raw.find(TEXT_MARKER)? + TEXT_MARKER.len();
    let rest = &raw[start..];

    let mut escaped = false;
    let end = rest.char_indices().find_map(|(i, c)| {
        if escaped {
            escaped = false;
            None
        } else if c == '\\' {
            escaped = true;
            None
        } else if c == '"' {
            Some(i)
        } else {
            None
        }
    })?;
    if end == 0 {
        return None;
    }

    Some(rest[..end].replace("\\n", "\n").replace("\\\"", "\""))
}
