//! Text Normalisation Module
//!
//! スプレッドシートのセル文字列をマークアップ生成前の正規形に変換するヘルパー群。
//! 空白の正規化、部分日付の正規化、URL抽出、XMLエスケープを提供します。

use regex::Regex;
use std::sync::OnceLock;

/// URLトークン（`http://` または `https://` で始まる非空白文字列）
fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)https?://\S+").expect("static URL pattern"))
}

/// 空白として扱う文字かどうか
///
/// Unicodeの`White_Space`に加えて、BOM（U+FEFF）も空白として扱います。
fn is_space_like(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// すべての空白文字（ノーブレークスペース等を含む）を通常のスペースに置換する
///
/// 文字数は変化しません。正規化済みの入力に対しては恒等写像です。
///
/// # 使用例
///
/// ```rust
/// use teipeople::normalise_text;
///
/// assert_eq!(normalise_text("Jane\u{a0}Doe"), "Jane Doe");
/// ```
pub fn normalise_text(text: &str) -> String {
    text.chars()
        .map(|c| if is_space_like(c) { ' ' } else { c })
        .collect()
}

/// ISO形式に近い部分日付（`YYYY[-MM[-DD]]`）を正規化する
///
/// `-`で分割し、空の要素を取り除いたうえで、先頭要素（年）のみを4桁にゼロ埋めします。
/// 月・日はゼロ埋めしません。
///
/// # 戻り値
///
/// * 空文字列の入力はそのまま返す
/// * 要素がひとつも残らない入力（例: `"--"`）は空文字列を返す
///
/// # 使用例
///
/// ```rust
/// use teipeople::normalise_date;
///
/// assert_eq!(normalise_date("5-3"), "0005-3");
/// assert_eq!(normalise_date("812-05-1"), "0812-05-1");
/// assert_eq!(normalise_date(""), "");
/// ```
pub fn normalise_date(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }

    let mut components = date.split('-').filter(|part| !part.is_empty());
    let Some(year) = components.next() else {
        return String::new();
    };

    let mut normalised = format!("{:0>4}", year);
    for part in components {
        normalised.push('-');
        normalised.push_str(part);
    }
    normalised
}

/// テキストに含まれるHTTP/HTTPSのURLをすべて抽出する
///
/// スキーム部分は大文字小文字を区別しません。見つからない場合は空のベクターを返します。
///
/// # 使用例
///
/// ```rust
/// use teipeople::extract_urls;
///
/// assert_eq!(
///     extract_urls("see http://a.org and https://b.org/x"),
///     vec!["http://a.org", "https://b.org/x"]
/// );
/// assert!(extract_urls("").is_empty());
/// ```
pub fn extract_urls(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    url_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// テキストノード用のエスケープ（`&`, `<`, `>`）
///
/// `&`を最初に置換するため、他の置換で生成された実体参照が二重にエスケープされることはありません。
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 属性値用のエスケープ
///
/// `escape_text`に加えて、`"`を`&quot;`、`'`を`&apos;`に置換します。
pub fn escape_attribute(text: &str) -> String {
    escape_text(text)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
