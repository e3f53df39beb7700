//! Prompt construction for the generation service.

use crate::types::GenerationRequest;

/// System instruction sent alongside every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a domain name generator. \
Respond with a single valid JSON array of objects, each with exactly one \"domain\" key. \
Do not add explanations, markdown or any text outside the JSON array.";

/// Render the instruction string for one request.
///
/// Pure: the same request always yields the same prompt.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let extensions = &request.extensions;
    let extensions_str = extensions.join(", ");

    // Callers guarantee a non-empty list; ".com" keeps a hand-built request
    // from panicking.
    let first = extensions.first().map(String::as_str).unwrap_or(".com");
    let second = extensions.get(1).map(String::as_str).unwrap_or(first);
    let third = extensions.get(2).map(String::as_str).unwrap_or(first);

    format!(
        r#"Generate {n} high-quality, brandable domain names for this business: {idea}

Style: {style}

**CRITICAL DOMAIN RULES:**
1.  **Concise & Memorable:** Names should be short, easy to remember, and easy to spell. Avoid long or complex words.
2.  **No Hyphens or Numbers:** Do not use hyphens or numbers in the domain names.
3.  **No Country Names:** Do not include country names unless it is core to the brand's identity and requested in the idea.
4.  **Valid Characters Only:** Only use letters (a-z).

**CRITICAL EXTENSION REQUIREMENTS:**
- Use ONLY these extensions: {extensions_str}
- DISTRIBUTE EVENLY across ALL selected extensions. If you have {num_extensions} extensions, create a roughly equal number of domains for each.
- DO NOT favor any single extension over others.

**OUTPUT FORMAT:**
Return a single, valid JSON array of objects. Each object must have a "domain" key. Do not include any other text.

Example:
[
{{"domain":"example{first}"}},
{{"domain":"business{second}"}},
{{"domain":"startup{third}"}}
]

Remember: Generate {n} domains and DISTRIBUTE EVENLY across: {extensions_str}"#,
        n = request.count,
        idea = request.idea,
        style = request.style.prompt_fragment(),
        extensions_str = extensions_str,
        num_extensions = extensions.len(),
        first = first,
        second = second,
        third = third,
    )
}
