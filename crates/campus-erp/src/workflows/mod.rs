pub mod admissions;
pub mod fees;
pub mod storage;
