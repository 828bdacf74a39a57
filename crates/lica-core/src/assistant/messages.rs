//! Fixed user-facing text

use crate::models::{LLAMA, NEMOTRON};

/// Shown at the top of every help and answer message
pub const DISCLAIMER: &str = "\
IMPORTANT: I am LICA, an AI assistant designed to provide general financial education.
Please note:
- I may make mistakes and my responses should not be considered as professional financial advice
- For specific financial decisions, please consult with a qualified financial advisor
- The information provided is for educational purposes only
- Response times may vary:
  • nvidia/nemotron-4-340b-instruct: May take over 2 minutes as it provides more detailed, customized advice

  • meta/llama-3.1-405b-instruct: Faster responses for quick inquiries

- Remember: Good things take time! For the most comprehensive analysis, please be patient.";

pub const UNSUPPORTED_FORMAT_MESSAGE: &str =
    "Unsupported file format. Please upload a PDF or image file.";

const RULE_WIDTH: usize = 50;

const RESOURCES: [(&str, &str); 3] = [
    (
        "Consumer Financial Protection Bureau",
        "https://www.consumerfinance.gov/",
    ),
    (
        "Financial Planning Association",
        "https://www.plannersearch.org/",
    ),
    (
        "Khan Academy Finance",
        "https://www.khanacademy.org/economics-finance-domain",
    ),
];

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Welcome text for an empty request; `model` is shown as-is
pub fn welcome_message(model: &str) -> String {
    format!(
        r#"{DISCLAIMER}

👋 Welcome! You can:
1. Ask any financial question directly
2. Upload a document (PDF, Image) and ask questions about it

Note: For document analysis, we automatically use {LLAMA} model.
The {NEMOTRON} model currently doesn't support document analysis.

Example: Upload your credit score report and ask "What steps can I take to improve my credit score?"
Our AI will analyze your report and provide personalized recommendations!

Currently using model: {model}"#
    )
}

/// Wrap a model answer with the disclaimer, banner, and resource links
pub fn answer_message(model: &str, response: &str) -> String {
    let resources = RESOURCES
        .iter()
        .map(|(name, url)| format!("- {}: {}", name, url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{DISCLAIMER}\n\n\
         💡 ANALYSIS & GUIDANCE (Using {model})\n\
         {rule}\n\
         {response}\n\n\
         📚 RECOMMENDED RESOURCES\n\
         {rule}\n\
         {resources}\n\n\
         ❓ Want to learn more? Feel free to ask follow-up questions!",
        rule = rule(),
    )
}

/// Last-resort text when the pipeline itself fails
pub fn processing_error_message(cause: &str) -> String {
    format!("Error processing request: {}", cause)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_embeds_model() {
        let msg = welcome_message("acme/unknown");
        assert!(msg.starts_with(DISCLAIMER));
        assert!(msg.contains("👋 Welcome! You can:"));
        assert!(msg.ends_with("Currently using model: acme/unknown"));
    }

    #[test]
    fn test_answer_layout() {
        let msg = answer_message(LLAMA, "Pay down revolving balances first.");
        let expected_banner = format!(
            "💡 ANALYSIS & GUIDANCE (Using meta/llama-3.1-405b-instruct)\n{}\nPay down revolving balances first.\n",
            "-".repeat(50)
        );
        assert!(msg.starts_with(DISCLAIMER));
        assert!(msg.contains(&expected_banner));
        assert!(msg.contains("- Consumer Financial Protection Bureau: https://www.consumerfinance.gov/"));
        assert!(msg.contains("- Khan Academy Finance: https://www.khanacademy.org/economics-finance-domain"));
        assert!(msg.ends_with("❓ Want to learn more? Feel free to ask follow-up questions!"));
    }

    #[test]
    fn test_processing_error() {
        assert_eq!(
            processing_error_message("boom"),
            "Error processing request: boom"
        );
    }
}
