//! Stanford CoreNLP request/response codec.
//!
//! CoreNLP is asked to treat every line as one sentence, so a batch of `n`
//! strings goes out as `n` newline-separated lines and comes back as `n`
//! sentences. The HTTP transport stays with the caller: [`CoreNlpTagger`]
//! only needs a closure that posts a body with the given properties and
//! returns the raw JSON.

use std::error::Error as StdError;

use serde::Deserialize;
use serde_json::json;

use crate::{TagError, TaggedToken, Tagger};

pub const ANNOTATORS: &str = "tokenize,ssplit,pos,lemma";

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    sentences: Vec<Sentence>,
}

#[derive(Deserialize)]
struct Sentence {
    #[serde(default)]
    tokens: Vec<Token>,
}

#[derive(Deserialize)]
struct Token {
    word: String,
    pos: String,
    lemma: String,
}

/// Properties to pass as the `properties` query parameter.
pub fn request_properties() -> String {
    json!({
        "annotators": ANNOTATORS,
        "ssplit.eolonly": "true",
        "outputFormat": "json",
    })
    .to_string()
}

/// One line per input; embedded line breaks would split a sentence in two.
pub fn request_body(batch: &[String]) -> String {
    batch
        .iter()
        .map(|s| s.replace(['\r', '\n'], " "))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn decode_response(body: &str) -> Result<Vec<Vec<TaggedToken>>, TagError> {
    let response: Response = serde_json::from_str(body)?;
    Ok(response
        .sentences
        .into_iter()
        .map(|sentence| {
            sentence
                .tokens
                .into_iter()
                .map(|t| TaggedToken {
                    surface: t.word,
                    tag: t.pos,
                    lemma: t.lemma,
                })
                .collect()
        })
        .collect())
}

/// [`Tagger`] speaking the CoreNLP server protocol over a caller-supplied
/// transport `post(body, properties) -> json`.
pub struct CoreNlpTagger<F> {
    post: F,
}

impl<F> CoreNlpTagger<F> {
    pub fn new(post: F) -> Self {
        Self { post }
    }
}

impl<F, E> Tagger for CoreNlpTagger<F>
where
    F: Fn(&str, &str) -> Result<String, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    fn tag(&self, batch: &[String]) -> Result<Vec<Vec<TaggedToken>>, TagError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let body = request_body(batch);
        let raw = (self.post)(&body, &request_properties())
            .map_err(|e| TagError::Transport(e.into()))?;
        decode_response(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "sentences": [
            {"index": 0, "tokens": [
                {"index": 1, "word": "she", "pos": "PRP", "lemma": "she"},
                {"index": 2, "word": "sleeps", "pos": "VBZ", "lemma": "sleep"}
            ]},
            {"index": 1, "tokens": [
                {"index": 1, "word": "dog", "pos": "NN", "lemma": "dog"}
            ]}
        ]
    }"#;

    #[test]
    fn decodes_sentences_in_order() {
        let tagged = decode_response(RESPONSE).unwrap();
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0][1], TaggedToken::new("sleeps", "VBZ", "sleep"));
        assert_eq!(tagged[1][0].lemma, "dog");
    }

    #[test]
    fn builds_one_line_per_input() {
        let batch = vec!["she sleeps".to_string(), "a\nb".to_string()];
        assert_eq!(request_body(&batch), "she sleeps\na b");
        let props: serde_json::Value = serde_json::from_str(&request_properties()).unwrap();
        assert_eq!(props["annotators"], ANNOTATORS);
        assert_eq!(props["ssplit.eolonly"], "true");
    }

    #[test]
    fn tagger_posts_through_transport() {
        let tagger = CoreNlpTagger::new(|body: &str, _props: &str| {
            assert_eq!(body, "she sleeps\ndog");
            Ok::<_, std::io::Error>(RESPONSE.to_string())
        });
        let batch = vec!["she sleeps".to_string(), "dog".to_string()];
        let tagged = tagger.tag(&batch).unwrap();
        assert_eq!(tagged[0][1].lemma, "sleep");
    }

    #[test]
    fn transport_failure_is_reported() {
        let tagger = CoreNlpTagger::new(|_: &str, _: &str| {
            Err::<String, _>(std::io::Error::other("connection refused"))
        });
        let err = tagger.tag(&["dog".to_string()]).unwrap_err();
        assert!(matches!(err, TagError::Transport(_)));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(decode_response("not json"), Err(TagError::Decode(_))));
    }
}
