use ntr_core::Category;

pub const SYSTEM_PROMPT: &str = r###"You are an assistant that generates article metadata and full article content. Given a user prompt describing what article they want, respond with ONLY a valid JSON object (no markdown code fences, no explanation, no other text). Use these exact keys (all strings unless noted):
- slug: URL-friendly slug (lowercase, hyphens, e.g. "my-article-title")
- title: article title
- excerpt: short summary (1-3 sentences)
- body: full article text with 6-8 distinct paragraphs. CRITICAL: separate each paragraph with exactly one blank line (double newline \n\n). Do NOT output one long paragraph. Section headings go on their own line starting with "## ". No other markdown.
- category: must be exactly one of: Movies, TV, Gaming, Tech, Culture
- imageKeywords: 2-4 comma-separated English keywords that describe a photo that would fit this article (e.g. "sci-fi movie,cinema,space" or "gaming,controller,screen"). Used to fetch a topic-related image. No spaces after commas.
- imageAlt: short description of the image for accessibility (what the image shows)
- readTime: estimated read time in minutes as a string number (e.g. "5")"###;

pub const TRENDING_SYSTEM_PROMPT: &str = r#"You are an entertainment and technology news editor who knows what people are talking about right now. Respond with ONLY a valid JSON object (no markdown code fences, no explanation). The object must have exactly these keys: "Movies", "TV", "Gaming", "Tech", "Culture". Each value is one specific, timely topic (a short phrase, not a sentence) that would make a good article today."#;

/// User prompt asking for one trending topic per category.
pub fn trending_prompt() -> String {
    let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
    format!(
        "What is trending right now? Give one topic for each of these categories: {}.",
        names.join(", ")
    )
}

/// Prompt for a batch article about `topic`.
pub fn category_article_prompt(category: Category, topic: &str) -> String {
    format!(
        "Write a short, engaging article about: {}. Category is {}. Use a casual, readable tone. \
         Include 6-8 paragraphs and 2-4 section headings (## Heading). Make it timely and interesting.",
        topic.trim(),
        category.name()
    )
}
