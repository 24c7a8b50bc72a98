//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! いずれのエラーも処理全体を中断させる致命的なものとして扱い、
//! 呼び出し元（最終的には`main`）まで`?`で伝播させます。

use thiserror::Error;

/// teipeopleクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: 入力ファイルが存在しない、書き込みに失敗した等
/// - `Parse`: スプレッドシートの解析エラー（calamine由来）
/// - `Xml`: マークアップの書き出しエラー（quick-xml由来）
/// - `Pattern` / `Glob`: 対象ファイル探索のエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `MissingIdentifier`: 厳格モードで識別子が空の行を検出した
/// - `EmptyWorkbook`: 読み込めるシートが存在しない
///
/// # 使用例
///
/// ```rust,no_run
/// use teipeople::TeiPeopleError;
/// use std::fs::File;
///
/// fn open_sheet(path: &str) -> Result<File, TeiPeopleError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(file)
/// }
/// ```
#[derive(Error, Debug)]
pub enum TeiPeopleError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// スプレッドシートの解析中に発生したエラー
    #[error("Failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLの書き出し中に発生したエラー
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// 対象ファイルのパターンが不正
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// 対象ファイルの列挙中に発生したエラー
    #[error("Failed to enumerate target files: {0}")]
    Glob(#[from] glob::GlobError),

    /// 出力バッファのUTF-8変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConfigBuilder::build()`時、またはシート選択の解決時に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use teipeople::{ConfigBuilder, TeiPeopleError};
    ///
    /// let result = ConfigBuilder::new(".").with_indent(0).build();
    ///
    /// match result {
    ///     Err(TeiPeopleError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 識別子が空の行（`IdPolicy::Strict`の場合のみ）
    #[error("Row {row} has an empty identifier")]
    MissingIdentifier {
        /// シート上の行番号（1始まり）
        row: usize,
    },

    /// ワークブックにシートが存在しない
    #[error("Workbook contains no sheets")]
    EmptyWorkbook,
}
