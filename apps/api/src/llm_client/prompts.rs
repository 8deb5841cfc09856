// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs alongside it and composes these where it needs them.

/// System prompt fragment that asks for bare JSON output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
