pub mod chat_message;
pub mod employee;
pub mod presence;
pub mod role;
pub mod status;
pub mod time_record;
