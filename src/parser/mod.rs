//! Parser Module
//!
//! calamineを使用したスプレッドシートの読み込みと、
//! 行データから人物レコードへの変換を提供します。

mod row;
mod workbook;

pub use row::decode_row;
pub(crate) use workbook::WorkbookReader;
