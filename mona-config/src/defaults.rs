//! Built-in prompt texts and provider settings.

/// Default chat model.
pub const MODEL: &str = "gpt-4o-mini";

/// Default output token budget.
pub const MAX_TOKENS: u32 = 2000;

/// Default sampling temperature.
pub const TEMPERATURE: f32 = 0.7;

/// Default provider timeout, in seconds.
pub const TIMEOUT_SECS: u64 = 60;

/// Default provider base URL.
pub const BASE_URL: &str = "https://api.openai.com/";

/// Default persona sent as the system message.
pub const SYSTEM_PROMPT: &str = "Tu es un expert en histoire de l'art spécialisé dans l'analyse d'œuvres d'art. Tu fournis des informations détaillées, précises et enrichies. Tu réponds toujours en Markdown bien formaté.";

/// Default template for `informations_ia`.
pub const USER_PROMPT_TEMPLATE: &str = "Tu es un expert en histoire de l'art. Fournis des informations détaillées et enrichies sur l'œuvre suivante :

Titre: {titre}
Artiste: {artiste}
Date: {date}
Musée: {musee}
{techniques}

Fournis des informations sur :
1. Le contexte historique et artistique de cette œuvre
2. L'importance de cette œuvre dans la carrière de l'artiste
3. Les techniques et innovations utilisées
4. L'influence et l'héritage de cette œuvre
5. Des détails intéressants ou des anecdotes

Réponds en français, de manière claire et structurée, en environ 500-800 mots. Utilise le format Markdown pour structurer ta réponse avec des titres, des listes, etc.";

/// Default template for `ce_quil_faut_voir`.
pub const CE_QUIL_FAUT_VOIR_TEMPLATE: &str = "Tu guides un visiteur devant l'œuvre suivante :

Titre: {titre}
Artiste: {artiste}
Date: {date}
Musée: {musee}

Indique ce qu'il faut regarder en priorité : les détails à ne pas manquer, la composition, la lumière et les couleurs, les symboles éventuels.

Réponds en français, en 150 à 300 mots, sous forme d'une courte liste Markdown de points à observer.";
