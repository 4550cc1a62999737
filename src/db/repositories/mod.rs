pub mod favorites;
pub mod sessions;
pub mod storage;
