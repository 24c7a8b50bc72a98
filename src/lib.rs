//! teipeople - TEI standoff person list builder
//!
//! スプレッドシートの人物台帳（氏名、生没年、典拠ID、メモ）からTEIのスタンドオフ文書を生成し、
//! 既存のTEI文書群の人物参照をその文書への相対参照に書き換えるクレートです。
//!
//! 処理は2つの独立したジョブで構成され、この順に実行します。
//!
//! 1. [`Extractor`]: 台帳の各行を`person`要素に変換し、`listPerson`として1つの文書に書き出す
//! 2. [`Rewriter`]: 対象文書から埋め込みの`listPerson`を取り除き、
//!    `ref="#person-<id>"`を`ref="<相対パス>#person-<id>"`に書き換える
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use teipeople::{ConfigBuilder, Extractor, Rewriter};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // <root>/_temp/PersName database.xlsx -> <root>/metadata/people.xml
//!     let config = ConfigBuilder::new("/data/letters").build()?;
//!
//!     let extracted = Extractor::new(&config).run()?;
//!     println!("{} people written", extracted.written);
//!
//!     // <root>/GB-*.xml
//!     let rewritten = Rewriter::new(&config).run()?;
//!     println!("{} files updated", rewritten.files_changed);
//!
//!     Ok(())
//! }
//! ```
//!
//! # In-memory Conversion
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use teipeople::{ConfigBuilder, Extractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigBuilder::new(".").with_indent(2).build()?;
//! let workbook: Vec<u8> = vec![]; // スプレッドシートのバイト列
//! let (xml, report) = Extractor::new(&config).render(Cursor::new(workbook))?;
//! println!("{} entries\n{}", report.entries, xml);
//! # Ok(())
//! # }
//! ```

mod api;
mod builder;
mod error;
mod extractor;
mod output;
mod parser;
mod rewriter;
mod text;
mod types;

// 公開API
pub use api::{IdPolicy, SheetSelector};
pub use builder::{Config, ConfigBuilder, DocumentHeader};
pub use error::TeiPeopleError;
pub use extractor::{ExtractReport, Extractor};
pub use output::{tag_name, NameSegment, StandoffDocument};
pub use parser::decode_row;
pub use rewriter::{
    qualify_person_refs, relative_href, strip_person_listing, RewriteOutcome, RewriteReport,
    Rewriter,
};
pub use text::{escape_attribute, escape_text, extract_urls, normalise_date, normalise_text};
pub use types::{Column, LifeEvent, NameTagging, PersonRecord, TagOutcome};
