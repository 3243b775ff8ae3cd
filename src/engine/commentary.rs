//! Text-generation collaborator seam.
//!
//! The commentary service is an opaque text-in/text-out collaborator,
//! asked to explain an engine evaluation in plain language. It is only
//! consulted once an evaluation figure is available.

pub trait CommentaryProvider {
    /// One prompt in, one response (or an error description) out.
    fn generate(&mut self, prompt: &str) -> Result<String, String>;
}

/// Compose the evaluation-explanation prompt from the position listing and
/// the engine's verdict.
pub fn build_evaluation_prompt(position_description: &str, evaluation: f64) -> String {
    format!(
        "I have a chess board with the following pieces:\n\
         {position_description}\n\
         The engine evaluates this position at {evaluation:+.2} from White's \
         side. Explain what this evaluation means in fewer than 150 words."
    )
}

/// Ask the provider to comment on an evaluated position. A provider error
/// is logged and degrades to `None`.
pub fn request_commentary(
    provider: &mut dyn CommentaryProvider,
    position_description: &str,
    evaluation: f64,
) -> Option<String> {
    let prompt = build_evaluation_prompt(position_description, evaluation);
    match provider.generate(&prompt) {
        Ok(text) => Some(text),
        Err(err) => {
            log::warn!("commentary request failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedProvider {
        reply: Result<String, String>,
        prompts: Vec<String>,
    }

    impl CommentaryProvider for CannedProvider {
        fn generate(&mut self, prompt: &str) -> Result<String, String> {
            self.prompts.push(prompt.to_owned());
            self.reply.clone()
        }
    }

    #[test]
    fn prompt_carries_the_position_and_the_signed_evaluation() {
        let prompt = build_evaluation_prompt("White King is at e1", 0.56);
        assert!(prompt.contains("White King is at e1"));
        assert!(prompt.contains("+0.56"));

        let prompt = build_evaluation_prompt("Black King is at e8", -1.2);
        assert!(prompt.contains("-1.20"));
    }

    #[test]
    fn commentary_passes_the_provider_reply_through() {
        let mut provider = CannedProvider {
            reply: Ok("A small edge for White.".to_owned()),
            prompts: Vec::new(),
        };
        let text = request_commentary(&mut provider, "White King is at e1", 0.3)
            .expect("provider reply");
        assert_eq!(text, "A small edge for White.");
        assert_eq!(provider.prompts.len(), 1);
    }

    #[test]
    fn provider_errors_degrade_to_none() {
        let mut provider = CannedProvider {
            reply: Err("service unavailable".to_owned()),
            prompts: Vec::new(),
        };
        assert!(request_commentary(&mut provider, "desc", 0.0).is_none());
    }
}
