/// Minimum length for a room code.
pub const MIN_ROOM_CODE_LENGTH: usize = 4;

/// Minimum length for a league code.
pub const MIN_LEAGUE_CODE_LENGTH: usize = 4;

/// Minimum length for a player/bettor address.
pub const MIN_ADDRESS_LENGTH: usize = 10;

/// Minimum length for a (trimmed) anime selection.
pub const MIN_ANIME_LENGTH: usize = 2;

/// Minimum length for a (trimmed) league name.
pub const MIN_LEAGUE_NAME_LENGTH: usize = 2;

/// Maximum address length accepted by the codec.
pub const MAX_ADDRESS_LENGTH: usize = 64;

/// Maximum room/league code length accepted by the codec.
pub const MAX_CODE_LENGTH: usize = 32;

/// Maximum anime selection length accepted by the codec.
pub const MAX_ANIME_LENGTH: usize = 128;

/// Maximum league name length accepted by the codec.
pub const MAX_LEAGUE_NAME_LENGTH: usize = 64;

/// Maximum question text length carried through an answer submission.
pub const MAX_QUESTION_LENGTH: usize = 1024;

/// Maximum submitted answer length.
pub const MAX_ANSWER_LENGTH: usize = 256;

/// GOT minted to each player when the second seat fills. This is the single
/// event that funds the match economy.
pub const JOIN_BONUS: u64 = 20;

/// GOT minted to the winner of a completed or forfeited match.
pub const WIN_BONUS: u64 = 5;

/// One-time spectator airdrop, claimable once per address.
pub const SPECTATOR_AIRDROP: u64 = 10;

/// Maximum stake per bettor per room.
pub const MAX_BET: u64 = 10;

/// Tokens taken by a successful steal.
pub const STEAL_AMOUNT: u64 = 1;

/// Tokens taken by a successful steal while double-down is armed.
pub const DOUBLE_DOWN_STEAL_AMOUNT: u64 = 2;

/// Tokens burned from the victim when a steal attempt misses.
pub const FAILED_STEAL_BURN: u64 = 1;

/// Correct answers in a row required to earn the next power-up.
pub const POWER_UP_STREAK: u32 = 3;

/// Wrong answers in a row that trigger a streak burn.
pub const WRONG_STREAK_BURN_THRESHOLD: u32 = 5;

/// Tokens burned when the wrong-streak threshold fires.
pub const STREAK_BURN_AMOUNT: u64 = 1;

/// Questions each player answers in a full match.
pub const QUESTIONS_PER_PLAYER: u8 = 40;

/// First wild-card question number (36..=40 draw from the surprise pool).
pub const WILD_CARD_START: u8 = 36;

/// Balance a player is reset to at the start of an AI match.
pub const MATCH_RESET_BALANCE: u64 = 20;

/// Error codes for DuelError events
pub const ERROR_ROOM_CODE_TAKEN: u8 = 1;
pub const ERROR_ROOM_NOT_FOUND: u8 = 2;
pub const ERROR_ROOM_NOT_OPEN: u8 = 3;
pub const ERROR_ROOM_NOT_ACTIVE: u8 = 4;
pub const ERROR_INVALID_CODE: u8 = 5;
pub const ERROR_INVALID_ANIME: u8 = 6;
pub const ERROR_INVALID_ADDRESS: u8 = 7;
pub const ERROR_NOT_A_PARTICIPANT: u8 = 8;
pub const ERROR_OWN_ROOM: u8 = 9;
pub const ERROR_NO_SNIPE: u8 = 10;
pub const ERROR_INVALID_QUESTION_NUMBER: u8 = 11;
pub const ERROR_GAME_INCOMPLETE: u8 = 12;
pub const ERROR_AIRDROP_CLAIMED: u8 = 13;
pub const ERROR_BET_EXISTS: u8 = 14;
pub const ERROR_INVALID_BET_AMOUNT: u8 = 15;
pub const ERROR_INSUFFICIENT_FUNDS: u8 = 16;
pub const ERROR_ROOM_NOT_FINISHED: u8 = 17;
pub const ERROR_NO_BET: u8 = 18;
pub const ERROR_ALREADY_CLAIMED: u8 = 19;
pub const ERROR_LEAGUE_NOT_FOUND: u8 = 20;
pub const ERROR_LEAGUE_CODE_TAKEN: u8 = 21;
pub const ERROR_INVALID_LEAGUE_NAME: u8 = 22;
pub const ERROR_ALREADY_MEMBER: u8 = 23;
