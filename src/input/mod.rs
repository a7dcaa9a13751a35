//! Input processing module
//! Handles file detection, text extraction, and document loading

pub mod document;
pub mod file_detector;
pub mod manager;
pub mod text_extractor;
