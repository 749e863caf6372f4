//! # Shared Constants
//!
//! Limits, defaults, and canned strings shared by the library and the server.

/// The maximum number of characters kept in the knowledge blob.
pub const MAX_KNOWLEDGE_CHARS: usize = 4500;

/// The maximum number of history records written to disk on each save.
pub const HISTORY_CAP: usize = 50;

/// How many recent questions the admin view shows.
pub const RECENT_QUESTIONS_LIMIT: usize = 10;

/// How many characters of a question the admin view shows before eliding.
pub const RECENT_QUESTION_PREVIEW_CHARS: usize = 60;

/// How many characters of the knowledge blob the admin preview shows.
pub const KNOWLEDGE_PREVIEW_CHARS: usize = 500;

/// The default path of the knowledge file.
pub const DEFAULT_KNOWLEDGE_FILE: &str = "data/knowledge.txt";

/// The default path of the history file.
pub const DEFAULT_HISTORY_FILE: &str = "data/chat_history.json";

/// The default chat-completion endpoint.
pub const DEFAULT_CHAT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// The default model requested from the completion endpoint.
pub const DEFAULT_CHAT_MODEL: &str = "nvidia/nemotron-3-nano-30b-a3b:free";

pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 350;

pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// The outbound request timeout, in seconds.
pub const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 30;

/// The per-word delay of the typing replay, in milliseconds.
pub const DEFAULT_REVEAL_WORD_DELAY_MS: u64 = 30;

/// The assistant greeting that opens every new session.
pub const GREETING: &str = "Hi 👋 How can I help you today?";

/// Canned replies substituted when the completion call fails or returns nothing.
pub const FALLBACK_MESSAGES: [&str; 3] = [
    "I'm not completely sure, but I'll try to help you.",
    "Let me guide you with the available information.",
    "That's a good question. Here's what I can tell you.",
];

/// Static shortcuts offered next to the chat input.
pub const QUICK_REPLIES: [&str; 4] = [
    "Book Appointment",
    "Doctors Schedule",
    "Lab Reports",
    "Contact Hospital",
];

/// The currency appended to consultation fees.
pub const FEE_CURRENCY: &str = "PKR";
