//! Closed word tables used by the validator: contractions, regional spellings
//! and a small synonym list per language.

/// Contraction -> expanded form. Both sides of a comparison are expanded, which
/// makes the equivalence bidirectional.
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("i've", "i have"),
    ("i'll", "i will"),
    ("i'd", "i would"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("you'll", "you will"),
    ("he's", "he is"),
    ("he'll", "he will"),
    ("she's", "she is"),
    ("she'll", "she will"),
    ("it's", "it is"),
    ("it'll", "it will"),
    ("we're", "we are"),
    ("we've", "we have"),
    ("we'll", "we will"),
    ("they're", "they are"),
    ("they've", "they have"),
    ("they'll", "they will"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("let's", "let us"),
    ("won't", "will not"),
    ("can't", "cannot"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("hadn't", "had not"),
    ("shouldn't", "should not"),
    ("wouldn't", "would not"),
    ("couldn't", "could not"),
];

/// British spelling -> American spelling
pub const REGIONAL_SPELLINGS: &[(&str, &str)] = &[
    ("grey", "gray"),
    ("colour", "color"),
    ("flavour", "flavor"),
    ("favourite", "favorite"),
    ("analyse", "analyze"),
    ("centre", "center"),
    ("theatre", "theater"),
    ("metre", "meter"),
    ("litre", "liter"),
    ("programme", "program"),
    ("practise", "practice"),
    ("licence", "license"),
    ("defence", "defense"),
    ("offence", "offense"),
    ("realise", "realize"),
    ("organise", "organize"),
    ("recognise", "recognize"),
    ("travelling", "traveling"),
    ("cancelled", "canceled"),
    ("jewellery", "jewelry"),
    ("honour", "honor"),
    ("favour", "favor"),
    ("neighbour", "neighbor"),
    ("behaviour", "behavior"),
    ("humour", "humor"),
    ("labour", "labor"),
    ("mum", "mom"),
];

const EN_SYNONYMS: &[(&str, &[&str])] = &[
    ("happy", &["joyful", "cheerful", "glad", "pleased", "content"]),
    ("sad", &["unhappy", "miserable", "upset"]),
    ("big", &["large", "huge", "enormous", "giant"]),
    ("small", &["little", "tiny"]),
    ("good", &["great", "excellent", "wonderful"]),
    ("bad", &["awful", "terrible", "horrible"]),
    ("fast", &["quick", "rapid", "speedy"]),
    ("smart", &["intelligent", "clever", "bright"]),
    ("beautiful", &["pretty", "lovely", "gorgeous"]),
    ("rich", &["wealthy"]),
    ("easy", &["simple"]),
    ("difficult", &["hard", "challenging", "tough"]),
    ("funny", &["hilarious", "amusing"]),
    ("angry", &["mad", "furious", "annoyed"]),
    ("tired", &["exhausted", "sleepy"]),
    ("scared", &["afraid", "frightened"]),
    ("kind", &["nice", "caring"]),
];

const ES_SYNONYMS: &[(&str, &[&str])] = &[
    ("bonito", &["hermoso", "lindo", "bello"]),
    ("rapido", &["veloz"]),
    ("casa", &["hogar", "vivienda"]),
    ("coche", &["carro", "auto", "automovil"]),
    ("trabajo", &["empleo"]),
    ("grande", &["enorme"]),
    ("pequeno", &["chico", "diminuto"]),
    ("feliz", &["contento", "alegre"]),
];

const FR_SYNONYMS: &[(&str, &[&str])] = &[
    ("grand", &["enorme", "immense"]),
    ("petit", &["minuscule"]),
    ("beau", &["joli", "magnifique"]),
    ("rapide", &["vite"]),
    ("heureux", &["content", "joyeux"]),
];

/// Expand every contraction token in an already cleaned answer
pub fn expand_contractions(text: &str) -> String {
    map_tokens(text, CONTRACTIONS)
}

/// Rewrite British spellings to American ones (token-wise)
pub fn normalize_regional(text: &str) -> String {
    map_tokens(text, REGIONAL_SPELLINGS)
}

/// Synonyms of an accent-free, lower-case headword
pub fn synonyms(word: &str, language: &str) -> &'static [&'static str] {
    let table = match language {
        "en" => EN_SYNONYMS,
        "es" => ES_SYNONYMS,
        "fr" => FR_SYNONYMS,
        _ => return &[],
    };
    table
        .iter()
        .find(|(head, _)| *head == word)
        .map(|(_, list)| *list)
        .unwrap_or(&[])
}

fn map_tokens(text: &str, table: &[(&str, &str)]) -> String {
    text.split(' ')
        .map(|token| {
            table
                .iter()
                .find(|(from, _)| *from == token)
                .map(|(_, to)| *to)
                .unwrap_or(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
