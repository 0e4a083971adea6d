//! Translator engines (C8): an AI batch translator plus ordered fallback
//! engines, all implementing the single `TranslatorEngine` port.

pub mod ai_translator;
pub mod web_engines;

pub use ai_translator::AiBatchTranslator;
pub use web_engines::{BaiduTranslateEngine, BingTranslateEngine, GoogleTranslateEngine};
