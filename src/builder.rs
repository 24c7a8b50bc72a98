//! Builder Module
//!
//! Fluent Builder APIを提供し、両ジョブに渡す不変の`Config`を段階的に構築する。

use crate::api::{IdPolicy, SheetSelector};
use crate::error::TeiPeopleError;
use std::path::{Path, PathBuf};

/// 入力スプレッドシートのプロジェクトルートからの相対位置
const DEFAULT_INPUT: &str = "_temp/PersName database.xlsx";

/// 出力するスタンドオフ文書のプロジェクトルートからの相対位置
const DEFAULT_OUTPUT: &str = "metadata/people.xml";

/// 参照を書き換える対象ファイルのパターン（ルート直下のみ）
const DEFAULT_TARGET_PATTERN: &str = "GB-*.xml";

/// インデント幅（スペース数）
const DEFAULT_INDENT: usize = 4;

/// スタンドオフ文書の`teiHeader`に記載する定型文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHeader {
    /// `titleStmt/title`
    pub title: String,
    /// `publicationStmt/p`
    pub publication: String,
    /// `sourceDesc/p`
    pub source_description: String,
}

impl Default for DocumentHeader {
    fn default() -> Self {
        Self {
            title: "People Metadata".to_string(),
            publication: "File created by Evolving Hands project, Newcastle University"
                .to_string(),
            source_description:
                "Metadata file containing information about people referenced in the project"
                    .to_string(),
        }
    }
}

/// 両ジョブの設定
///
/// 構築後は変更できません。`ConfigBuilder::build()`で検証済みの値のみが生成されます。
#[derive(Debug, Clone)]
pub struct Config {
    input: PathBuf,
    output: PathBuf,
    root: PathBuf,
    target_pattern: String,
    indent: usize,
    sheet_selector: SheetSelector,
    id_policy: IdPolicy,
    header: DocumentHeader,
}

impl Config {
    /// プロジェクトルートから標準レイアウトの設定を生成する
    ///
    /// - 入力: `<root>/_temp/PersName database.xlsx`
    /// - 出力: `<root>/metadata/people.xml`
    /// - 対象: `<root>/GB-*.xml`
    pub fn for_project(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            input: root.join(DEFAULT_INPUT),
            output: root.join(DEFAULT_OUTPUT),
            target_pattern: DEFAULT_TARGET_PATTERN.to_string(),
            indent: DEFAULT_INDENT,
            sheet_selector: SheetSelector::First,
            id_policy: IdPolicy::Permissive,
            header: DocumentHeader::default(),
            root,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn target_pattern(&self) -> &str {
        &self.target_pattern
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn sheet_selector(&self) -> &SheetSelector {
        &self.sheet_selector
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    pub fn header(&self) -> &DocumentHeader {
        &self.header
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値（`Config::for_project`の標準レイアウト）が設定されており、
/// 必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use teipeople::{ConfigBuilder, IdPolicy};
///
/// # fn main() -> Result<(), teipeople::TeiPeopleError> {
/// let config = ConfigBuilder::new("/data/letters")
///     .with_output("/data/letters/metadata/people.xml")
///     .with_id_policy(IdPolicy::Strict)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// プロジェクトルートを指定してビルダーを生成する
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::for_project(root),
        }
    }

    /// 入力スプレッドシートのパスを指定する
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    /// 出力するスタンドオフ文書のパスを指定する
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }

    /// 参照を書き換える対象ファイルのパターンを指定する
    ///
    /// パターンはルートディレクトリ直下のファイル名にのみ適用されます。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use teipeople::ConfigBuilder;
    ///
    /// let builder = ConfigBuilder::new(".").with_target_pattern("GB-0*.xml");
    /// ```
    pub fn with_target_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.target_pattern = pattern.into();
        self
    }

    /// 出力文書のインデント幅（スペース数）を指定する
    pub fn with_indent(mut self, width: usize) -> Self {
        self.config.indent = width;
        self
    }

    /// 読み込むシートを選択する
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 識別子が空の行の扱いを指定する
    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.config.id_policy = policy;
        self
    }

    /// `teiHeader`の定型文を指定する
    pub fn with_header(mut self, header: DocumentHeader) -> Self {
        self.config.header = header;
        self
    }

    /// 設定を検証し、`Config`を生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `TeiPeopleError::Config(String)`:
    ///   * 対象パターンが空、またはパス区切り文字を含む
    ///   * インデント幅が0
    ///   * 出力パスにファイル名がない
    /// * `TeiPeopleError::Pattern`: 対象パターンがglobとして不正
    pub fn build(self) -> Result<Config, TeiPeopleError> {
        let config = self.config;

        // 1. 対象パターンの検証
        if config.target_pattern.is_empty() {
            return Err(TeiPeopleError::Config(
                "Target pattern must not be empty".to_string(),
            ));
        }
        if config.target_pattern.contains(['/', '\\']) {
            return Err(TeiPeopleError::Config(format!(
                "Target pattern must match file names directly under the root: '{}'",
                config.target_pattern
            )));
        }
        glob::Pattern::new(&config.target_pattern)?;

        // 2. インデント幅の検証
        if config.indent == 0 {
            return Err(TeiPeopleError::Config(
                "Indentation width must be at least 1".to_string(),
            ));
        }

        // 3. 出力パスの検証
        if config.output.file_name().is_none() {
            return Err(TeiPeopleError::Config(format!(
                "Output path has no file name: '{}'",
                config.output.display()
            )));
        }

        Ok(config)
    }
}
