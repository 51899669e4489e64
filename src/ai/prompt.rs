use crate::trends::RepositoryRecord;

const TRUNCATION_MARKER: &str = "...[content truncated]";

/// Cut `content` to at most `max_chars` characters, marking the cut
pub fn truncate_readme(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}

/// Generate a prompt asking for a three-point analysis of a trending repository
pub fn generate_insight_prompt(repo: &RepositoryRecord, readme: &str, max_chars: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are an expert on GitHub trends. Analyze the following project.\n\n");

    prompt.push_str("Project:\n");
    prompt.push_str(&format!("- Name: {}\n", repo.name));
    prompt.push_str(&format!("- Primary language: {}\n", repo.language));
    prompt.push_str(&format!("- Stars: {}\n", repo.stars));
    prompt.push_str(&format!(
        "- Description: {}\n",
        repo.description.as_deref().unwrap_or("none")
    ));

    prompt.push_str("\nREADME:\n");
    prompt.push_str(&truncate_readme(readme, max_chars));
    prompt.push_str("\n\n");

    prompt.push_str("Cover these three points:\n");
    prompt.push_str("1. Core functionality and the problem it solves\n");
    prompt.push_str("2. Technical highlights and innovations\n");
    prompt.push_str("3. Why it is getting attention right now\n\n");
    prompt.push_str("Requirements:\n");
    prompt.push_str("- Start every point with \"- \"\n");
    prompt.push_str("- At most 40 words per point\n");
    prompt.push_str("- Use precise but concise technical language\n");

    prompt
}

/// Normalize the model reply.
///
/// Keeps only the bullet lines when the reply has any, otherwise the trimmed
/// reply as is.
pub fn clean_response(response: &str) -> String {
    let bullets: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("- ") || line.starts_with("* "))
        .collect();

    if bullets.is_empty() {
        return response.trim().to_string();
    }

    bullets
        .iter()
        .map(|line| format!("- {}", line[2..].trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
