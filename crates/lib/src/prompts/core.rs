//! # Default Prompt Text
//!
//! The fixed instructions sent with every chat turn.

/// The system prompt for the hospital support assistant.
///
/// It sets the persona and asks for plain-text doctor listings instead of tables.
pub const HOSPITAL_SYSTEM_PROMPT: &str = "You are a hospital customer support chatbot. \
Respond politely, clearly, and professionally. \
When listing doctors and their schedules, use simple plain text format. \
DO NOT use markdown tables or table headers. \
Just list each doctor with their timing and fee in a simple readable format.";

/// The heading that introduces the knowledge blob in the user turn.
pub const KNOWLEDGE_HEADING: &str = "Hospital Knowledge:";

/// The formatting example appended after the question.
///
/// It shows the model the one-line-per-doctor style the formatter expects.
pub const DOCTOR_LISTING_INSTRUCTIONS: &str = "Important: When listing doctors and their schedules, use simple format like:\n\
Dr. Usman Tariq - Available: 5:00 PM – 9:00 PM, Fee: 2,200 PKR\n\
Dr. Farah Khan - Available: 10:00 AM – 1:00 PM, Fee: 2,400 PKR\n\
Do NOT use markdown tables or table headers. Just list doctors with their details simply.";
