pub mod series;
pub mod storage_path;
