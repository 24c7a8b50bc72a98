//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// 人物台帳として読み込むシートを指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// 最初のシート（デフォルト）
    #[default]
    First,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(1)` は2番目のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("People".to_string())`
    Name(String),
}

/// 識別子が空の行の扱い
///
/// 識別子が空の行からは`person-`という接尾辞のない文書内識別子が生成されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum IdPolicy {
    /// 警告を出力したうえで、そのままレコードを出力する（デフォルト）
    #[default]
    Permissive,

    /// `TeiPeopleError::MissingIdentifier`で処理を中断する
    Strict,
}
