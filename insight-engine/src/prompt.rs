//! Prompt assembly for grounded answering.
//! Keep the contract tight: answer only from supplied summaries, cite titles,
//! admit gaps instead of guessing.

use vector_index::ScoredMatch;

/// Returned when no stored summary clears the similarity threshold.
/// The model is never invoked in that case.
pub const FALLBACK_MESSAGE: &str = "I don't have enough information from the podcast database \
to answer this question confidently. Could you try asking something related to recent AI \
developments, tools, or insights from tech podcasts?";

/// Joins retained matches into one context block, ranked order preserved.
///
/// Each entry contributes its title and full summary; entries are separated
/// by a blank line.
pub fn build_context(matches: &[ScoredMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "Title: {}\nSummary:\n{}",
                m.metadata.podcast_title, m.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders the grounded answering prompt around the assembled context.
pub fn grounded_prompt(context: &str, question: &str, source_count: usize) -> String {
    format!(
        "You are an expert AI analyst specializing in podcast content analysis.\n\n\
         Below are {source_count} relevant podcast summaries related to the user's question:\n\n\
         {context}\n\n\
         TASK: Answer the question below using ONLY information from these podcast summaries.\n\
         - Cite specific podcasts using [Title] format when referencing information\n\
         - If the information provided is insufficient, clearly state what's missing\n\
         - Maintain a neutral, analytical tone throughout\n\
         - Structure complex answers with bullet points when appropriate\n\
         - Do NOT fabricate information not present in the summaries\n\n\
         Question: {question}\n\n\
         Answer: "
    )
}

/// Appends the human-readable sources footer to a model answer.
///
/// One line per retained match, in rank order, with `Untitled` / `No URL`
/// fallbacks for blank fields.
pub fn append_sources(answer: &str, matches: &[ScoredMatch]) -> String {
    let lines: Vec<String> = matches
        .iter()
        .map(|m| {
            let title = non_empty(&m.metadata.podcast_title).unwrap_or("Untitled");
            let url = non_empty(&m.metadata.podcast_url).unwrap_or("No URL");
            format!("- {title} ({url})")
        })
        .collect();
    format!("{answer}\n\n**Sources:**\n{}", lines.join("\n"))
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vector_index::DocumentMetadata;

    fn scored(title: &str, url: &str, content: &str, score: f32) -> ScoredMatch {
        ScoredMatch {
            content: content.into(),
            metadata: DocumentMetadata {
                episode_id: "ep".into(),
                podcast_title: title.into(),
                podcast_description: String::new(),
                podcast_url: url.into(),
                length: None,
                database_record_date: None,
                is_new: false,
            },
            score,
        }
    }

    #[test]
    fn context_lists_title_then_summary_blank_line_separated() {
        let matches = vec![
            scored("First", "https://a", "Alpha summary", 0.9),
            scored("Second", "https://b", "Beta summary", 0.5),
        ];
        let ctx = build_context(&matches);
        assert_eq!(
            ctx,
            "Title: First\nSummary:\nAlpha summary\n\nTitle: Second\nSummary:\nBeta summary"
        );
    }

    #[test]
    fn prompt_embeds_source_count_context_and_question() {
        let p = grounded_prompt("CTX", "What changed?", 2);
        assert!(p.contains("Below are 2 relevant podcast summaries"));
        assert!(p.contains("CTX"));
        assert!(p.contains("Question: What changed?"));
        assert!(p.contains("ONLY information from these podcast summaries"));
        assert!(p.ends_with("Answer: "));
    }

    #[test]
    fn footer_lists_sources_in_rank_order() {
        let matches = vec![
            scored("First", "https://a", "x", 0.9),
            scored("Second", "https://b", "y", 0.5),
        ];
        let out = append_sources("Answer body", &matches);
        assert_eq!(
            out,
            "Answer body\n\n**Sources:**\n- First (https://a)\n- Second (https://b)"
        );
    }

    #[test]
    fn footer_falls_back_for_blank_title_and_url() {
        let matches = vec![scored("", "  ", "x", 0.9)];
        let out = append_sources("A", &matches);
        assert!(out.ends_with("- Untitled (No URL)"));
    }

    #[test]
    fn fallback_message_suggests_rephrasing() {
        assert!(FALLBACK_MESSAGE.contains("podcast database"));
        assert!(FALLBACK_MESSAGE.contains("try asking"));
    }
}
