pub mod diary;
pub mod media;
pub mod mood_log;
