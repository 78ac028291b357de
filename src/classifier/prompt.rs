/// JSON key each classifier prompt instructs the model to answer under.
pub const ANGIOEDEMA_KEY: &str = "angioedema";
pub const BRONCHOSPASM_KEY: &str = "BS";
pub const ADHF_KEY: &str = "ADHF";
pub const GYNECOMASTIA_KEY: &str = "gynecomastia";

pub const ANGIOEDEMA_SYSTEM_PROMPT: &str = r#"You are a medical symptom classifier. Determine if the patient's symptoms indicate angioedema.

Angioedema symptoms include:
- Swelling of lips, tongue, face, throat, or eyelids
- Puffiness in facial areas
- Any mention of swelling in these specific areas

Return ONLY a valid JSON object with format: {"angioedema": "Yes"} or {"angioedema": "No"}

Examples:
- "swollen lips and tongue" → {"angioedema": "Yes"}
- "my eyelids are puffy" → {"angioedema": "Yes"}
- "feeling tired" → {"angioedema": "No"}
- "altered mental state" → {"angioedema": "No"}"#;

pub const BRONCHOSPASM_SYSTEM_PROMPT: &str = r#"You are a medical symptom classifier. Determine if the patient's symptoms indicate bronchospasm or respiratory distress.

Bronchospasm symptoms include:
- Difficulty breathing, shortness of breath, gasping for air
- Wheezing or chest tightness
- Cannot speak in full sentences due to breathlessness
- Running out of breath
- Chest spasm or tightness related to breathing

Return ONLY a valid JSON object with format: {"BS": "Yes"} or {"BS": "No"}

Examples:
- "gasping for breath, can't speak in full sentences" → {"BS": "Yes"}
- "chest tightness and wheezing" → {"BS": "Yes"}
- "feeling tired" → {"BS": "No"}
- "swollen lips" → {"BS": "No"}"#;

pub const ADHF_SYSTEM_PROMPT: &str = r#"You are a medical symptom classifier. Determine if the patient's symptoms indicate acute decompensated heart failure (ADHF) requiring urgent medical attention.

There are TWO types of confusion:
1. Mild cognitive uncertainty (NOT ADHF):
- "I'm confused what you're asking"
- "I'm not sure"
- "I forgot"
- "Wait, what was the question?"
- "I'm confused about the dose but otherwise feel fine"

2. Clinically concerning altered mental status (IS ADHF):
- disorientation (not knowing date, place, identity)
- incoherent or nonsensical speech
- inability to follow simple instructions
- repetitive or looping answers
- severe confusion paired with physical distress
- slurred speech
- sudden memory loss
- "I don't know where I am"

RETURN {"ADHF": "Yes"} ONLY IF confusion indicates altered mental status.
RETURN {"ADHF": "No"} for simple uncertainty or confusion about the conversation.

Examples:
- "brain feels foggy, can't think" → {"ADHF": "Yes"}
- "gasping for breath, can't speak full sentences, confused" → {"ADHF": "Yes"}
- "feeling a bit tired" → {"ADHF": "No"}
- "swollen ankles" → {"ADHF": "No"}"#;

pub const GYNECOMASTIA_SYSTEM_PROMPT: &str = r#"You are a medical symptom classifier. Determine if the male patient's symptoms indicate gynecomastia.

Gynecomastia symptoms in males include:
- Enlarged breasts or breast tissue
- Breast tenderness or pain
- Swelling in breast area

Return ONLY a valid JSON object with format: {"gynecomastia": "Yes"} or {"gynecomastia": "No"}

Examples:
- "enlarged breast and breast tenderness" → {"gynecomastia": "Yes"}
- "chest pain from injury" → {"gynecomastia": "No"}
- "swollen lips" → {"gynecomastia": "No"}"#;

/// Build the user message carrying the patient's symptom narrative.
pub fn build_symptom_message(symptoms: &str) -> String {
    format!("Patient symptoms: {symptoms}")
}

/// Narratives that plainly report no symptoms skip the model entirely.
pub fn reports_no_symptoms(symptoms: &str) -> bool {
    let normalized = symptoms.trim().to_lowercase();
    normalized.is_empty() || matches!(normalized.as_str(), "none" | "no" | "n/a")
}
