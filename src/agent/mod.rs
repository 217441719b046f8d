//! Generative-AI integration for post writing
//!
//! This module provides:
//! - The Gemini API client (text and vision calls)
//! - The pick commentary writer (analysis, hashtags, tweet assembly)
//! - Betting-slip screenshot extraction

pub mod gemini;
pub mod slip;
pub mod writer;

pub use gemini::{GeminiClient, GeminiConfig};
pub use slip::SlipAnalyzer;
pub use writer::{PickWriter, Selector};
