//! Prompt templates for the interaction fallback and the chat assistant.

/// System instruction for interaction analysis.
pub const INTERACTION_SYSTEM_PROMPT: &str = r#"You are a clinical pharmacology assistant that screens drug pairs for interactions.

Answer only with a single JSON object, no prose and no markdown.
Only report an interaction when it is clinically documented. If you are not sure, set "interaction" to false.

Severity must be one of: Minor, Moderate, Major.
Risk must be one of: Low, Medium, High, Critical, Fatal."#;

/// User prompt for a single drug pair.
///
/// Callers pass the names in canonical order so the same pair always yields
/// the same prompt.
pub fn make_interaction_prompt(first: &str, second: &str) -> String {
    format!(
        r#"Analyze the interaction between "{}" and "{}".

Return a JSON object with these fields:
- interaction: true if a clinically significant interaction exists, otherwise false
- severity: Minor, Moderate or Major (null if no interaction)
- risk: Low, Medium, High, Critical or Fatal (null if no interaction)
- effects: the adverse outcome (null if no interaction)
- mechanism: the pharmacological cause (null if no interaction)
- recommendation: the advised action"#,
        first, second
    )
}

/// Persona requested by the chat caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatRole {
    #[default]
    Patient,
    Doctor,
    Supplier,
}

impl ChatRole {
    /// Parse a role label; unknown labels fall back to `Patient`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "doctor" => ChatRole::Doctor,
            "supplier" => ChatRole::Supplier,
            _ => ChatRole::Patient,
        }
    }

    fn instruction(self) -> &'static str {
        match self {
            ChatRole::Patient => {
                "You are the Health Concierge. Simplify medical information for patients and use a friendly tone."
            }
            ChatRole::Doctor => {
                "You are the Clinical Intelligence Agent. Assist doctors with evidence-based data, interactions and renal dose adjustments, using professional terminology."
            }
            ChatRole::Supplier => {
                "You are the Supply Chain Strategist. Focus on stock forecasting, demand spikes and reorder decisions."
            }
        }
    }
}

/// System instruction for the chat assistant, grounded in the pharmacy's own data.
pub fn chat_system_prompt(role: ChatRole, inventory_json: &str, history_json: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are PharmAI, a pharmacy assistant. ROLE: ");
    prompt.push_str(role.instruction());
    prompt.push_str("\n\nCONTEXT:\n- Inventory: ");
    prompt.push_str(inventory_json);
    prompt.push_str("\n- Patient history: ");
    prompt.push_str(history_json);
    prompt.push_str(
        "\n\nBEHAVIOR:\n- Respond in the user's language (English, Marathi or Hindi).\n- Keep responses structured and concise.\n- Never state that a drug combination is safe; advise checking with a pharmacist.",
    );

    prompt
}
