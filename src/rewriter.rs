//! Reference Rewriter
//!
//! 対象のTEI文書から埋め込みの人物リストを取り除き、
//! 文書内の人物参照をスタンドオフ文書への相対参照に書き換えるジョブ。
//!
//! 文書は構造解析せずテキストとして扱います。置換の契約は以下の2つです。
//!
//! - 人物リストの除去: 最初の`<listPerson ...>`（自己終了タグは除く）から、
//!   入れ子を数えて対応する`</listPerson>`までの区間（直前の空白を含む）を削除する。
//!   タグ名は大文字小文字を区別せず、対応する終了タグがなければ何もしない
//! - 参照の修飾: `ref="#person-`（大文字小文字を区別しない）を
//!   `ref="<相対パス>#person-` に置換する（置換文字列はそのまま挿入）

use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::ops::Range;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::builder::Config;
use crate::error::TeiPeopleError;

fn listing_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<(/?)listPerson\b[^>]*>").expect("static listPerson pattern")
    })
}

/// 最初の`listPerson`ブロックのバイト範囲（直前の空白を含む）
fn listing_span(content: &str) -> Option<Range<usize>> {
    let mut start = 0;
    let mut depth = 0usize;

    for caps in listing_tag_pattern().captures_iter(content) {
        let tag = caps.get(0)?;
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());

        if closing {
            if depth == 0 {
                continue;
            }
            depth -= 1;
            if depth == 0 {
                let start = content[..start].trim_end().len();
                return Some(start..tag.end());
            }
        } else if !tag.as_str().ends_with("/>") {
            if depth == 0 {
                start = tag.start();
            }
            depth += 1;
        }
    }
    None
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r##"(?i)ref="#person-"##).expect("static ref pattern"))
}

/// 最初の`listPerson`ブロックを取り除く
///
/// 自己終了の`<listPerson/>`は対象外です。入れ子の`listPerson`は外側のブロックごと取り除きます。
/// 一致しない場合は入力をそのまま返します。何度適用しても結果は変わりません
/// （ブロックが1つだけの場合）。
///
/// # 使用例
///
/// ```rust
/// use teipeople::strip_person_listing;
///
/// let content = "<body>\n  <listPerson>\n    <person/>\n  </listPerson>\n</body>";
/// assert_eq!(strip_person_listing(content), "<body>\n</body>");
/// ```
pub fn strip_person_listing(content: &str) -> Cow<'_, str> {
    match listing_span(content) {
        Some(span) => {
            let mut stripped = String::with_capacity(content.len() - span.len());
            stripped.push_str(&content[..span.start]);
            stripped.push_str(&content[span.end..]);
            Cow::Owned(stripped)
        }
        None => Cow::Borrowed(content),
    }
}

/// 文書内の人物参照を`href`で修飾する
///
/// 戻り値は（置換後の内容, 置換した参照の数）です。
/// 既に修飾済みの参照（`#`で始まらないもの）は対象外のため、繰り返し適用しても変化しません。
///
/// # 使用例
///
/// ```rust
/// use teipeople::qualify_person_refs;
///
/// let (content, count) = qualify_person_refs(r##"<persName ref="#person-5"/>"##, "metadata/people.xml");
/// assert_eq!(content, r##"<persName ref="metadata/people.xml#person-5"/>"##);
/// assert_eq!(count, 1);
/// ```
pub fn qualify_person_refs<'a>(content: &'a str, href: &str) -> (Cow<'a, str>, usize) {
    let count = reference_pattern().find_iter(content).count();
    if count == 0 {
        return (Cow::Borrowed(content), 0);
    }
    let replacement = format!("ref=\"{}#person-", href);
    (
        reference_pattern().replace_all(content, NoExpand(&replacement)),
        count,
    )
}

/// `from_dir`から`to_file`への相対パスを`/`区切りで返す
///
/// 両方のパスを絶対パスにしたうえで字句的に正規化（`.`と`..`の解決）して比較します。
/// シンボリックリンクは解決しません。
pub fn relative_href(from_dir: &Path, to_file: &Path) -> Result<String, TeiPeopleError> {
    let from = normalise_path(&absolute(from_dir)?);
    let to = normalise_path(&absolute(to_file)?);

    // ドライブ等が異なる場合は相対パスにできない
    if from.components().next() != to.components().next() {
        return Ok(to.to_string_lossy().replace('\\', "/"));
    }

    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
    parts.extend(
        to_parts[common..]
            .iter()
            .map(|part| part.as_os_str().to_string_lossy().into_owned()),
    );
    Ok(parts.join("/"))
}

fn normalise_path(path: &Path) -> PathBuf {
    let mut normalised = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalised.pop();
            }
            other => normalised.push(other.as_os_str()),
        }
    }
    normalised
}

fn absolute(path: &Path) -> Result<PathBuf, TeiPeopleError> {
    if path.as_os_str().is_empty() {
        return Ok(std::env::current_dir()?);
    }
    Ok(std::path::absolute(path)?)
}

/// 1ファイル分の書き換え結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// 書き換え後の内容
    pub content: String,
    /// `listPerson`ブロックを取り除いたかどうか
    pub listing_removed: bool,
    /// 修飾した参照の数
    pub references: usize,
}

impl RewriteOutcome {
    pub fn is_changed(&self) -> bool {
        self.listing_removed || self.references > 0
    }
}

/// 書き換え処理の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// パターンに一致したファイルの数
    pub files_found: usize,
    /// 内容が変化して書き戻したファイルの数
    pub files_changed: usize,
    /// `listPerson`ブロックを取り除いたファイルの数
    pub listings_removed: usize,
    /// 修飾した参照の総数
    pub references_qualified: usize,
}

/// 対象文書の参照を書き換えるジョブ
#[derive(Debug, Clone)]
pub struct Rewriter {
    config: Config,
}

impl Rewriter {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// ルートディレクトリ直下でパターンに一致するファイルを列挙する
    ///
    /// 順序はglobの列挙順です。
    pub fn targets(&self) -> Result<Vec<PathBuf>, TeiPeopleError> {
        let root = glob::Pattern::escape(&self.config.root().to_string_lossy());
        let pattern = Path::new(&root).join(self.config.target_pattern());
        info!(
            "Finding relevant TEI files in the \"{}\" path.",
            pattern.display()
        );

        let mut targets = Vec::new();
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = entry?;
            if path.is_file() {
                targets.push(path);
            }
        }
        info!("Found {} files.", targets.len());
        Ok(targets)
    }

    /// 1ファイル分の内容を書き換える（ファイルには書き込まない）
    ///
    /// `path`は参照先の相対パスを計算するためにのみ使用します。
    pub fn rewrite_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<RewriteOutcome, TeiPeopleError> {
        let from_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let href = relative_href(from_dir, self.config.output())?;

        let stripped = strip_person_listing(content);
        let listing_removed = matches!(stripped, Cow::Owned(_));
        let (qualified, references) = qualify_person_refs(&stripped, &href);

        Ok(RewriteOutcome {
            content: qualified.into_owned(),
            listing_removed,
            references,
        })
    }

    /// ファイルを読み込んで書き換え、内容が変化した場合のみ同じパスに書き戻す
    pub fn rewrite_file(&self, path: &Path) -> Result<RewriteOutcome, TeiPeopleError> {
        info!("Opening the \"{}\" file.", path.display());
        let content = fs::read_to_string(path)?;

        let outcome = self.rewrite_content(path, &content)?;
        if outcome.is_changed() {
            info!("Saving process data to \"{}\".", path.display());
            fs::write(path, &outcome.content)?;
        } else {
            info!("Nothing to rewrite in \"{}\".", path.display());
        }
        Ok(outcome)
    }

    /// すべての対象ファイルを順番に書き換える
    pub fn run(&self) -> Result<RewriteReport, TeiPeopleError> {
        if !self.config.output().exists() {
            warn!(
                "Standoff document \"{}\" does not exist yet; references will point at it anyway.",
                self.config.output().display()
            );
        }

        let targets = self.targets()?;
        let mut report = RewriteReport {
            files_found: targets.len(),
            ..RewriteReport::default()
        };

        for path in &targets {
            let outcome = self.rewrite_file(path)?;
            if outcome.is_changed() {
                report.files_changed += 1;
            }
            if outcome.listing_removed {
                report.listings_removed += 1;
            }
            report.references_qualified += outcome.references;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConfigBuilder;

    #[test]
    fn test_strip_person_listing() {
        let content = "<standOff>\n    <listPerson>\n        <person xml:id=\"person-1\"/>\n    </listPerson>\n</standOff>";
        assert_eq!(strip_person_listing(content), "<standOff>\n</standOff>");
    }

    #[test]
    fn test_strip_person_listing_is_case_insensitive_and_tolerates_attributes() {
        let content = "<a>  <LISTPERSON type=\"x\">\n<p/>\n</LISTPERSON >tail</a>";
        assert_eq!(strip_person_listing(content), "<a>tail</a>");
    }

    #[test]
    fn test_strip_person_listing_first_block_only() {
        let content = "<a> <listPerson>1</listPerson> <listPerson>2</listPerson></a>";
        assert_eq!(
            strip_person_listing(content),
            "<a> <listPerson>2</listPerson></a>"
        );
    }

    #[test]
    fn test_strip_person_listing_skips_self_closing_list() {
        let content = "<TEI>\n  <particDesc><listPerson/></particDesc>\n  <body><p>keep me</p></body>\n  <back>\n    <listPerson>\n      <person/>\n    </listPerson>\n  </back>\n</TEI>";
        assert_eq!(
            strip_person_listing(content),
            "<TEI>\n  <particDesc><listPerson/></particDesc>\n  <body><p>keep me</p></body>\n  <back>\n  </back>\n</TEI>"
        );
    }

    #[test]
    fn test_strip_person_listing_self_closing_with_attributes() {
        let content = "<a><listPerson type=\"x\" /><p>keep</p></a>";
        let stripped = strip_person_listing(content);
        assert!(matches!(stripped, Cow::Borrowed(_)));
        assert_eq!(stripped, content);
    }

    #[test]
    fn test_strip_person_listing_removes_nested_block_whole() {
        let content = "<a>\n  <listPerson>\n    <listPerson><person/></listPerson>\n    <person/>\n  </listPerson>\n  <p>keep</p>\n</a>";
        assert_eq!(strip_person_listing(content), "<a>\n  <p>keep</p>\n</a>");
    }

    #[test]
    fn test_strip_person_listing_unterminated_block() {
        let content = "<a> <listPerson><person/></a>";
        assert_eq!(strip_person_listing(content), content);
    }

    #[test]
    fn test_strip_person_listing_ignores_similar_names() {
        let content = "<a><listPersonGroup>x</listPersonGroup></a>";
        assert_eq!(strip_person_listing(content), content);
    }

    #[test]
    fn test_strip_person_listing_without_block() {
        let content = "<text>no listing</text>";
        let stripped = strip_person_listing(content);
        assert!(matches!(stripped, Cow::Borrowed(_)));
        assert_eq!(stripped, content);
    }

    #[test]
    fn test_qualify_person_refs() {
        let content = r##"<p><persName ref="#person-5">A</persName><rs REF="#person-6">B</rs><x ref="#place-1"/></p>"##;
        let (qualified, count) = qualify_person_refs(content, "../metadata/people.xml");
        assert_eq!(count, 2);
        assert_eq!(
            qualified,
            r##"<p><persName ref="../metadata/people.xml#person-5">A</persName><rs ref="../metadata/people.xml#person-6">B</rs><x ref="#place-1"/></p>"##
        );
    }

    #[test]
    fn test_qualify_person_refs_is_idempotent() {
        let content = r##"<persName ref="#person-5"/>"##;
        let (once, _) = qualify_person_refs(content, "people.xml");
        let (twice, count) = qualify_person_refs(&once, "people.xml");
        assert_eq!(count, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_qualify_person_refs_replacement_is_literal() {
        let (qualified, _) = qualify_person_refs(r##"ref="#person-1""##, "$1/people.xml");
        assert_eq!(qualified, r##"ref="$1/people.xml#person-1""##);
    }

    #[test]
    fn test_relative_href() {
        assert_eq!(
            relative_href(Path::new("/p/letters"), Path::new("/p/metadata/people.xml")).unwrap(),
            "../metadata/people.xml"
        );
        assert_eq!(
            relative_href(Path::new("/p"), Path::new("/p/metadata/people.xml")).unwrap(),
            "metadata/people.xml"
        );
        assert_eq!(
            relative_href(Path::new("/p/a/./b/.."), Path::new("/p/people.xml")).unwrap(),
            "../people.xml"
        );
    }

    #[test]
    fn test_relative_href_from_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            relative_href(Path::new(""), &cwd.join("metadata/people.xml")).unwrap(),
            "metadata/people.xml"
        );
    }

    #[test]
    fn test_rewrite_content() {
        let config = ConfigBuilder::new("/p")
            .with_output("/p/metadata/people.xml")
            .build()
            .unwrap();
        let rewriter = Rewriter::new(&config);

        let content = "<TEI>\n  <listPerson>\n    <person xml:id=\"person-5\"/>\n  </listPerson>\n  <persName ref=\"#person-5\">X</persName>\n</TEI>";
        let outcome = rewriter
            .rewrite_content(Path::new("/p/letters/GB-1.xml"), content)
            .unwrap();

        assert!(outcome.listing_removed);
        assert_eq!(outcome.references, 1);
        assert!(outcome.is_changed());
        assert_eq!(
            outcome.content,
            "<TEI>\n  <persName ref=\"../metadata/people.xml#person-5\">X</persName>\n</TEI>"
        );
    }

    #[test]
    fn test_rewrite_content_unchanged() {
        let config = ConfigBuilder::new("/p").build().unwrap();
        let rewriter = Rewriter::new(&config);
        let outcome = rewriter
            .rewrite_content(Path::new("/p/GB-1.xml"), "<TEI/>")
            .unwrap();
        assert!(!outcome.is_changed());
        assert_eq!(outcome.content, "<TEI/>");
    }
}
