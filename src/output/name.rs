//! Name Tagging
//!
//! 氏名テキストの中から名・姓の文字列を探し、`forename`/`surname`で囲む区間を決定する。
//! 照合は正規表現ではなく文字列の完全一致で、最初に見つかった位置のみを対象とします。

use crate::types::{NameTagging, TagOutcome};

/// `persName`の内容を構成する区間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSegment<'a> {
    /// タグで囲まないテキスト
    Text(&'a str),
    /// `forename`で囲むテキスト
    Forename(&'a str),
    /// `surname`で囲むテキスト
    Surname(&'a str),
}

/// 氏名を区間に分割し、タグ付けの結果とともに返す
///
/// 姓の検索では、名として確定した区間と重なる位置は読み飛ばします。
/// 名・姓が氏名の中にそのまま現れない場合（順序の違い、愛称、発音区別符号の差異など）は
/// そのタグを付けず、`TagOutcome::Missing`を返します。
///
/// # 使用例
///
/// ```rust
/// use teipeople::{tag_name, NameSegment, TagOutcome};
///
/// let (segments, tagging) = tag_name("Jane Doe", "Jane", "Doe");
/// assert_eq!(
///     segments,
///     vec![
///         NameSegment::Forename("Jane"),
///         NameSegment::Text(" "),
///         NameSegment::Surname("Doe"),
///     ]
/// );
/// assert_eq!(tagging.forename, TagOutcome::Tagged);
/// assert_eq!(tagging.surname, TagOutcome::Tagged);
/// ```
pub fn tag_name<'a>(
    display: &'a str,
    first: &str,
    last: &str,
) -> (Vec<NameSegment<'a>>, NameTagging) {
    let forename = find_span(display, first, None);
    let surname = find_span(display, last, forename.span());

    let mut spans: Vec<(usize, usize, bool)> = Vec::with_capacity(2);
    if let Some((start, end)) = forename.span() {
        spans.push((start, end, true));
    }
    if let Some((start, end)) = surname.span() {
        spans.push((start, end, false));
    }
    spans.sort_by_key(|(start, _, _)| *start);

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;
    for (start, end, is_forename) in spans {
        if start > cursor {
            segments.push(NameSegment::Text(&display[cursor..start]));
        }
        let text = &display[start..end];
        segments.push(if is_forename {
            NameSegment::Forename(text)
        } else {
            NameSegment::Surname(text)
        });
        cursor = end;
    }
    if cursor < display.len() {
        segments.push(NameSegment::Text(&display[cursor..]));
    }

    let tagging = NameTagging {
        forename: forename.outcome(),
        surname: surname.outcome(),
    };
    (segments, tagging)
}

enum Search {
    Found(usize, usize),
    Missing,
    Empty,
}

impl Search {
    fn span(&self) -> Option<(usize, usize)> {
        match self {
            Search::Found(start, end) => Some((*start, *end)),
            _ => None,
        }
    }

    fn outcome(&self) -> TagOutcome {
        match self {
            Search::Found(..) => TagOutcome::Tagged,
            Search::Missing => TagOutcome::Missing,
            Search::Empty => TagOutcome::Empty,
        }
    }
}

fn find_span(haystack: &str, needle: &str, taken: Option<(usize, usize)>) -> Search {
    if needle.is_empty() {
        return Search::Empty;
    }

    haystack
        .match_indices(needle)
        .map(|(start, matched)| (start, start + matched.len()))
        .find(|(start, end)| match taken {
            Some((taken_start, taken_end)) => *end <= taken_start || *start >= taken_end,
            None => true,
        })
        .map_or(Search::Missing, |(start, end)| Search::Found(start, end))
}
