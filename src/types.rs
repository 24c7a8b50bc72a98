//! Types Module
//!
//! クレート全体で使用する人物レコード関連のデータ型を定義するモジュール。

use crate::text::normalise_date;

/// スプレッドシートの列レイアウト（0始まり）
///
/// 1行目はヘッダー行として読み飛ばされ、2行目以降が以下の位置で解釈されます。
/// `Unused1`と`Unused11`は台帳側の作業用の列で、出力には使用しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id = 0,
    Unused1 = 1,
    DisplayName = 2,
    FirstName = 3,
    Death = 4,
    DeathNotBefore = 5,
    DeathNotAfter = 6,
    Birth = 7,
    BirthNotBefore = 8,
    BirthNotAfter = 9,
    LastName = 10,
    Unused11 = 11,
    ExternalId = 12,
    Note = 13,
    SourceNote = 14,
}

impl Column {
    /// レイアウト全体の列数（末尾の予備列を含む）
    pub const COUNT: usize = 16;

    /// レコードとして読み取る必要のある最小の列数
    pub const REQUIRED: usize = Column::SourceNote as usize + 1;

    /// 列インデックス
    pub fn index(self) -> usize {
        self as usize
    }
}

/// 出生・死亡などの部分日付イベント
///
/// `when`, `notBefore`, `notAfter`の3つはそれぞれ独立に省略可能です。
/// 値は生のセル文字列（トリム済み）で保持し、属性の生成時に正規化します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifeEvent {
    /// 確定日付
    pub when: Option<String>,
    /// この日付以降
    pub not_before: Option<String>,
    /// この日付以前
    pub not_after: Option<String>,
}

impl LifeEvent {
    /// 3つのセル値からイベントを生成する（空文字列は`None`として扱う）
    pub fn from_cells(when: &str, not_before: &str, not_after: &str) -> Self {
        Self {
            when: non_empty(when),
            not_before: non_empty(not_before),
            not_after: non_empty(not_after),
        }
    }

    /// すべての要素が欠けているかどうか
    pub fn is_empty(&self) -> bool {
        self.when.is_none() && self.not_before.is_none() && self.not_after.is_none()
    }

    /// 出力する属性（名前, 正規化済みの値）の一覧
    ///
    /// 正規化の結果が空になった要素は含めません。
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        [
            ("when", &self.when),
            ("notBefore", &self.not_before),
            ("notAfter", &self.not_after),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = normalise_date(value.as_deref()?);
            (!value.is_empty()).then_some((name, value))
        })
        .collect()
    }
}

/// 1行分の人物レコード
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    /// シート上の行番号（1始まり、ヘッダー行が1）
    pub row: usize,
    /// 外部識別子（`person-<id>`の生成に使用）
    pub id: String,
    /// 正規化済みの氏名
    pub display_name: String,
    /// 正規化済みの名
    pub first_name: String,
    /// 正規化済みの姓
    pub last_name: String,
    pub birth: LifeEvent,
    pub death: LifeEvent,
    /// 典拠ファイル（VIAF）の識別子
    pub external_id: Option<String>,
    pub note: Option<String>,
    /// URL抽出の対象となる出典メモ
    pub source_note: Option<String>,
}

impl PersonRecord {
    /// 文書内識別子（`xml:id`）
    pub fn xml_id(&self) -> String {
        format!("person-{}", self.id)
    }
}

/// 名・姓のタグ付け結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    /// タグ付けに成功した
    Tagged,
    /// 氏名の中に該当する文字列が見つからなかった
    Missing,
    /// タグ付けする文字列が空だった
    Empty,
}

/// `persName`要素に対するタグ付けパスの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameTagging {
    pub forename: TagOutcome,
    pub surname: TagOutcome,
}

impl NameTagging {
    /// 名・姓のどちらかが氏名の中に見つからなかったかどうか
    pub fn has_miss(&self) -> bool {
        self.forename == TagOutcome::Missing || self.surname == TagOutcome::Missing
    }
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
