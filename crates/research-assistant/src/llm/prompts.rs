//! Prompt templates.

/// First-round prompt: one search keyword per line.
#[must_use]
pub fn keyword_prompt(topic: &str, description: &str) -> String {
    format!(
        "You help researchers find related academic work.\n\
         Generate between 10 and 20 search keywords for the topic and project description \
         below. Each keyword must be usable as a query on Semantic Scholar, arXiv or Google \
         Scholar and must stay relevant to the topic.\n\
         Return one keyword per line with no numbering and no extra text.\n\n\
         Topic: {topic}\n\n\
         Description: {description}\n"
    )
}

/// Second-round prompt: keep only relevant keywords as a bracketed list.
#[must_use]
pub fn filter_prompt(topic: &str, description: &str, keywords: &[String]) -> String {
    let list = keywords.iter().map(|k| format!("'{k}'")).collect::<Vec<_>>().join(", ");
    format!(
        "Given the keyword list: [{list}]\n\
         Topic: {topic}\n\
         Description: {description}\n\n\
         Remove every keyword that is not relevant to the topic and description or that would \
         not find papers on Semantic Scholar, arXiv or Google Scholar.\n\
         Return the remaining keywords in exactly this format: ['keyword1', 'keyword2', ...]\n"
    )
}

/// Abstract summarization prompt.
#[must_use]
pub fn summary_prompt(title: &str, abstract_text: &str, study_field: &str) -> String {
    let field = if study_field.trim().is_empty() {
        String::new()
    } else {
        format!("Frame the summary for the field of {study_field}.\n")
    };
    format!(
        "Summarize the abstract of the research paper below in one short paragraph of at most \
         5 sentences. Start with 'This paper is about'. Keep every important finding.\n\
         {field}\n\
         Title: {title}\n\n\
         Abstract: {abstract_text}\n"
    )
}

/// Retrieval-augmented answer prompt.
#[must_use]
pub fn retrieval_prompt(assistant_name: &str, context: &str, history: &str, question: &str) -> String {
    let history = if history.is_empty() {
        String::new()
    } else {
        format!("Conversation so far:\n{history}\n\n")
    };
    format!(
        "Your name is {assistant_name}, a research assistant helping a student find and \
         understand academic resources.\n\
         Answer using the resources below where they help. If you do not know the answer, say \
         so instead of making one up.\n\n\
         Resources:\n{context}\n\n\
         {history}\
         Question: {question}\n\n\
         Answer:"
    )
}
