//! Prompt templates for simplification and document Q&A.

/// How much document context a follow-up question carries (characters).
pub const QUESTION_CONTEXT_CHARS: usize = 2000;

/// Instruction prompt requesting the five-section simplification as JSON.
pub fn simplify_prompt(document_type: &str, document_text: &str) -> String {
    format!(
        "You are a legal expert specialising in making complex legal documents accessible \
         to everyday people.\n\
         \n\
         Document type: {document_type}\n\
         \n\
         Analyse this legal document and respond with a JSON object containing exactly \
         these sections:\n\
         \n\
         1. SIMPLIFIED_SUMMARY: a clear, plain-language summary with proper paragraphs\n\
         2. KEY_CLAUSES: the 5 most important clauses, each with:\n\
            - title: short descriptive title\n\
            - explanation: plain-language explanation\n\
            - importance: High, Medium, or Low\n\
            - original_excerpt: the actual text from the document, if identifiable\n\
         3. RISK_ASSESSMENT: overall_risk (a number from 1 to 10) and risk_factors \
         (a list of specific risks)\n\
         4. IMPORTANT_TERMS: key legal terms mapped to plain-language definitions\n\
         5. ACTION_ITEMS: specific things the reader should know or do\n\
         \n\
         Make everything conversational and easy to understand. Avoid legal jargon.\n\
         Respond ONLY with valid JSON. No markdown fences, no explanation.\n\
         \n\
         Document text:\n\
         {document_text}"
    )
}

/// Q&A prompt over the leading slice of the document.
pub fn question_prompt(document_text: &str, question: &str) -> String {
    let context = truncate_chars(document_text, QUESTION_CONTEXT_CHARS);
    format!(
        "Based on this legal document, answer the user's question in simple, clear \
         language. Avoid legal jargon and explain things as if talking to a friend.\n\
         Format your answer as HTML with <p>, <strong>, and <em> tags as needed.\n\
         \n\
         Document:\n\
         {context}\n\
         \n\
         Question: {question}"
    )
}

/// Cut a string to at most `max` characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
