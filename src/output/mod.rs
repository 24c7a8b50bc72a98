//! Output Module
//!
//! quick-xmlを使用してスタンドオフ文書（TEI）を生成するモジュール。

mod document;
mod name;
mod person;

pub use document::StandoffDocument;
pub use name::{tag_name, NameSegment};
