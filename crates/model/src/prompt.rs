/// Questions asked over direct messages, in order.
pub const PROMPTS: [&str; PROMPT_COUNT] = [
    "¿Cuál es tu nombre de usuario en Roblox?",
    "¿Qué es el Roleplay (RP)?",
    "¿Qué significa IC?",
    "¿Qué significa OOC?",
    "¿Qué es Metagaming (MG)?",
    "¿Qué es Powergaming (PG)?",
    "¿Está permitido hacer RDM o VDM? ¿Por qué?",
    "Si un staff te llama durante una situación de rol, ¿qué debes hacer?",
    "¿Has leído y aceptas las normas de Discord y RP de Albacete RP?",
];

pub const PROMPT_COUNT: usize = 9;
