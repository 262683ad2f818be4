//! Server-side prompt construction.
//!
//! The system instruction is selected here, on the server, from a fixed
//! table keyed by language tag. The client only ever supplies the
//! transcript; instruction text never crosses the wire in either
//! direction, so the persona and response constraints cannot be tampered
//! with.

/// The designated default table entry, used for missing or unknown tags.
pub const DEFAULT_LANG: &str = "en-US";

/// Instruction table: language tag → system instruction.
///
/// Every entry fixes the assistant persona, the output language, a
/// 100-word response budget, and a clear/direct/concise tone directive.
const INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "en-US",
        "You are Vox, a conversational assistant. Answer exactly what the \
         user asks, in English, in at most 100 words.\n\
         - Be clear, direct, and concise.\n\
         - Do not add extra information or personal commentary.\n\
         - Keep coherent, well-formed grammar.\n\
         - Always finish with a complete sentence.",
    ),
    (
        "es-ES",
        "Eres Vox, un asistente conversacional. Responde exactamente a lo \
         que el usuario pide, en español, en máximo 100 palabras.\n\
         - Sé claro, directo y conciso.\n\
         - No agregues información extra ni comentarios personales.\n\
         - Mantén coherencia y buena gramática.\n\
         - Termina la respuesta siempre con una oración completa.",
    ),
    (
        "fr-FR",
        "Tu es Vox, un assistant conversationnel. Réponds exactement à la \
         demande de l'utilisateur, en français, en 100 mots maximum.\n\
         - Sois clair, direct et concis.\n\
         - N'ajoute ni informations superflues ni commentaires personnels.\n\
         - Garde une grammaire cohérente et correcte.\n\
         - Termine toujours par une phrase complète.",
    ),
    (
        "de-DE",
        "Du bist Vox, ein Konversationsassistent. Beantworte genau die \
         Frage des Nutzers, auf Deutsch, in höchstens 100 Wörtern.\n\
         - Sei klar, direkt und präzise.\n\
         - Füge keine zusätzlichen Informationen oder persönlichen \
         Kommentare hinzu.\n\
         - Achte auf stimmige, korrekte Grammatik.\n\
         - Beende die Antwort immer mit einem vollständigen Satz.",
    ),
    (
        "pt-BR",
        "Você é Vox, um assistente conversacional. Responda exatamente ao \
         que o usuário pede, em português, em no máximo 100 palavras.\n\
         - Seja claro, direto e conciso.\n\
         - Não acrescente informações extras nem comentários pessoais.\n\
         - Mantenha coerência e boa gramática.\n\
         - Termine a resposta sempre com uma frase completa.",
    ),
    (
        "ja-JP",
        "あなたはVoxという会話アシスタントです。ユーザーの質問に日本語で、\
         100語以内で正確に答えてください。\n\
         - 明確に、率直に、簡潔に。\n\
         - 余計な情報や個人的なコメントを加えないこと。\n\
         - 一貫性のある正しい文法を保つこと。\n\
         - 必ず完全な文で締めくくること。",
    ),
];

/// Select the system instruction for a language tag.
///
/// Lookup is ASCII-case-insensitive. Missing, empty, or unrecognized tags
/// fall back to the [`DEFAULT_LANG`] entry. Total over all inputs; never
/// fails.
pub fn select_instruction(lang: Option<&str>) -> &'static str {
    let tag = lang.unwrap_or(DEFAULT_LANG);
    INSTRUCTIONS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(tag))
        .or_else(|| INSTRUCTIONS.iter().find(|(key, _)| *key == DEFAULT_LANG))
        .map(|(_, instruction)| *instruction)
        .unwrap_or_default()
}

/// Concatenate the selected instruction and the transcript into the full
/// prompt using the fixed template.
///
/// The template is stable so downstream behavior is reproducible given the
/// same inputs.
pub fn build_prompt(lang: Option<&str>, transcript: &str) -> String {
    let instruction = select_instruction(lang);
    format!("{instruction}\n\nUser: \"{transcript}\"\nAssistant:")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
