//! Question-context selection.
//!
//! Pure and stateless: category rotation and wild-card title picks are
//! deterministic functions of the room code and question number, so every
//! replica resolves the same context without consulting the oracle.

use super::WILD_CARD_START;

/// Thematic buckets cycled through normal rounds so a 40-question match covers
/// a different aspect of the anime every question.
pub const CATEGORIES: [&str; 8] = [
    "characters — personality, backstory, relationships, or character development",
    "fights and battles — specific moves, outcomes, strategies, or key moments in combat",
    "plot and story arcs — events, turning points, episode/chapter details, or consequences",
    "powers, abilities, and techniques — how they work, their names, limitations, or users",
    "world-building and lore — geography, factions, history, rules of the world",
    "quotes and dialogue — who said it, when, or what it means",
    "side characters and villains — motivations, abilities, roles, or fates",
    "lesser-known trivia — behind-the-scenes facts, manga differences, author intent, or obscure details",
];

/// Fixed pool the wild-card rounds (36..=40) draw from.
pub const WILD_CARD_POOL: [&str; 16] = [
    "Dragon Ball Z",
    "Hunter x Hunter",
    "Fullmetal Alchemist Brotherhood",
    "JoJo's Bizarre Adventure",
    "Tokyo Ghoul",
    "Re:Zero",
    "Sword Art Online",
    "Fairy Tail",
    "Black Clover",
    "Vinland Saga",
    "Mob Psycho 100",
    "Code Geass",
    "Cowboy Bebop",
    "Steins;Gate",
    "Neon Genesis Evangelion",
    "One Punch Man",
];

pub fn is_wild_card(question_num: u8) -> bool {
    question_num >= WILD_CARD_START
}

/// Category bucket for a normal-round question.
pub fn category_for(question_num: u8) -> &'static str {
    CATEGORIES[(question_num as usize - 1) % CATEGORIES.len()]
}

/// Deterministic wild-card pick for (room_code, question_num).
///
/// Seeds from the room code's first byte plus the question number, then probes
/// forward past any title matching either player's selection
/// (case-insensitive). Both exclusions cover at most two of sixteen titles, so
/// the probe always lands.
pub fn wild_card_pick(
    room_code: &str,
    question_num: u8,
    exclude_a: &str,
    exclude_b: &str,
) -> &'static str {
    let first = room_code.as_bytes().first().copied().unwrap_or(0) as usize;
    let start = (first + question_num as usize) % WILD_CARD_POOL.len();
    for offset in 0..WILD_CARD_POOL.len() {
        let title = WILD_CARD_POOL[(start + offset) % WILD_CARD_POOL.len()];
        if title.eq_ignore_ascii_case(exclude_a.trim()) || title.eq_ignore_ascii_case(exclude_b.trim())
        {
            continue;
        }
        return title;
    }
    // Unreachable with two exclusions; keep the seeded pick as a fallback.
    WILD_CARD_POOL[start]
}
