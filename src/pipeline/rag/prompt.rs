//! Prompt assembly: pure functions from retrieved/extracted material to a
//! single instruction string. No I/O and no retrieval happens here.
//!
//! Every prompt carries the same grounding contract: the model may only
//! use what the prompt contains. Section headers start with `###`, which
//! doubles as the generation stop marker, so a model that starts
//! inventing a new section is cut off.

use super::types::RetrievedSnippet;

/// Sentence the general prompt instructs the model to emit verbatim when
/// the context cannot answer the question. Downstream consumers
/// pattern-match on it; the wording must not drift.
pub const CONTEXT_FALLBACK: &str = "The context does not have enough information.";

fn render_context(snippets: &[RetrievedSnippet]) -> String {
    let mut out = String::new();
    for snippet in snippets {
        out.push_str(&format!(
            "- ({}) {}:\n{}\n\n",
            snippet.category, snippet.name, snippet.text
        ));
    }
    out
}

/// Grounded general Q&A prompt.
pub fn build_general_prompt(question: &str, snippets: &[RetrievedSnippet]) -> String {
    let context = render_context(snippets);
    format!(
        "You are an offline medical assistant.\n\
         Answer ONLY using the information in the context.\n\
         Stick to what is asked and be concise.\n\
         Do not paste the whole context back.\n\
         If the answer is not found in the context, say:\n\
         \"{CONTEXT_FALLBACK}\"\n\
         \n\
         ### CONTEXT:\n\
         {context}\n\
         ### QUESTION:\n\
         {question}\n\
         \n\
         ### ANSWER:\n"
    )
}

/// Lab-report analysis prompt: extracted report text plus retrieved
/// lab-reference knowledge.
pub fn build_report_prompt(
    question: &str,
    report_text: &str,
    snippets: &[RetrievedSnippet],
) -> String {
    let context = render_context(snippets);
    format!(
        "You are an expert medical report analysis assistant.\n\
         Use the extracted report text AND the retrieved medical knowledge to answer the user question.\n\
         Be accurate and avoid assumptions.\n\
         \n\
         ### REPORT EXTRACTED TEXT:\n\
         {report_text}\n\
         \n\
         ### RETRIEVED CONTEXT:\n\
         {context}\n\
         ### USER QUESTION:\n\
         {question}\n\
         \n\
         ### ANALYSIS:\n"
    )
}

/// Prescription interpretation prompt: extracted prescription text plus
/// retrieved medicine knowledge. Dosage is explained only when the
/// prescription states it; the disclaimer is always requested.
pub fn build_prescription_prompt(
    question: &str,
    prescription_text: &str,
    snippets: &[RetrievedSnippet],
) -> String {
    let context = render_context(snippets);
    format!(
        "You are a prescription interpretation assistant.\n\
         Use the prescription text and the retrieved medicine knowledge.\n\
         \n\
         You must:\n\
         - Identify the medicines in the prescription.\n\
         - Explain what each medicine is used for.\n\
         - Explain the dosage only if it is clearly written.\n\
         - Never infer a dosage that is not written.\n\
         - Warn the user to consult a doctor before any change.\n\
         \n\
         ### PRESCRIPTION TEXT:\n\
         {prescription_text}\n\
         \n\
         ### RELATED MEDICINE KNOWLEDGE:\n\
         {context}\n\
         ### QUESTION:\n\
         {question}\n\
         \n\
         ### INTERPRETATION:\n"
    )
}

/// Multi-document summary prompt over pre-joined document texts.
///
/// When no user question was supplied the question section is left out of
/// the prompt entirely, not rendered as an empty placeholder.
pub fn build_multi_document_summary_prompt(
    combined_text: &str,
    question: Option<&str>,
) -> String {
    let question_section = match question {
        Some(question) => format!("\n### USER QUESTION:\n{question}\n"),
        None => String::new(),
    };
    format!(
        "You are a medical document summarization assistant.\n\
         You will be given text extracted from multiple documents such as lab reports,\n\
         prescriptions, and doctor's notes.\n\
         \n\
         Your task:\n\
         - Provide a clean, organized medical summary.\n\
         - Highlight the key findings from each document.\n\
         - Identify abnormal values in lab results.\n\
         - Identify medicines and their uses in prescriptions.\n\
         - Do not guess or add information that is not present in the text.\n\
         - Keep the summary short, structured, and medically useful.\n\
         \n\
         ### EXTRACTED DOCUMENT TEXTS:\n\
         {combined_text}\n\
         {question_section}\n\
         ### SUMMARY:\n"
    )
}
