pub mod generation_client;
pub mod openai_client;
pub mod plan_log;
pub mod response_parser;
