// Interview feedback: transcript formatting, model assessment, storage and lookup.
// All model calls go through llm_client.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod readers;
pub mod requester;
pub mod schema;
pub mod transcript;
