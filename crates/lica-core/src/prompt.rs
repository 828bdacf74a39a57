//! Prompt templates
//!
//! Query and document text are interpolated verbatim.

/// Which template a request uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// A document was uploaded and produced text
    DocumentAnalysis,
    /// No usable document text
    GeneralAdvice,
}

impl PromptKind {
    pub fn for_context(context: &str) -> Self {
        if context.is_empty() {
            Self::GeneralAdvice
        } else {
            Self::DocumentAnalysis
        }
    }
}

/// Build the user prompt for a question and optional document text
pub fn build_prompt(query: &str, context: &str) -> String {
    match PromptKind::for_context(context) {
        PromptKind::DocumentAnalysis => document_analysis_prompt(query, context),
        PromptKind::GeneralAdvice => general_advice_prompt(query),
    }
}

fn document_analysis_prompt(query: &str, context: &str) -> String {
    format!(
        r#"You are a financial education assistant. You have been provided with a credit report or financial document.
Please analyze the following content and provide detailed, educational guidance:

DOCUMENT CONTENT:
{context}

USER QUESTION:
{query}

Provide a comprehensive response that includes:
1. Analysis of the provided document (if it's a credit report, analyze the key components)
2. Detailed explanation of relevant financial concepts
3. Specific recommendations based on the document content
4. Step-by-step guidance for improvement
5. Common pitfalls to avoid
6. Additional resources or next steps

Remember to maintain a helpful, educational tone while avoiding specific financial advice."#
    )
}

fn general_advice_prompt(query: &str) -> String {
    format!(
        r#"Provide clear, practical financial education advice about: {query}

Include:
1. Basic concept explanation
2. Real-world examples and scenarios
3. Step-by-step guidance
4. Common pitfalls to avoid
5. Practical tips for implementation

Remember to:
- Use simple, clear language
- Provide actionable advice
- Include relevant examples
- Highlight important warnings or considerations
- Focus on practical implementation"#
    )
}
