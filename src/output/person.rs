//! Person Fragment Writer
//!
//! 1件の`PersonRecord`を`person`要素として書き出す。

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::Write;

use crate::error::TeiPeopleError;
use crate::output::name::{tag_name, NameSegment};
use crate::text::{escape_attribute, escape_text, extract_urls};
use crate::types::{LifeEvent, NameTagging, PersonRecord};

/// 典拠ファイル識別子からリンクを生成する際のURL接頭辞
const VIAF_URL_PREFIX: &str = "http://viaf.org/viaf/";

/// `person`要素を書き出す
///
/// 要素の並びは`idno`、`persName`、`birth`、`death`、`note`、`ptr`の順です。
/// 値のない項目は要素ごと省略します。戻り値は`persName`のタグ付け結果です。
pub(crate) fn write_person<W: Write>(
    writer: &mut Writer<W>,
    record: &PersonRecord,
) -> Result<NameTagging, TeiPeopleError> {
    let mut person = BytesStart::new("person");
    person.push_attribute(escaped_attribute("xml:id", &record.xml_id()));
    writer.write_event(Event::Start(person))?;

    // <idno>
    if let Some(external_id) = &record.external_id {
        let mut idno = BytesStart::new("idno");
        idno.push_attribute(("type", "VIAF"));
        writer.write_event(Event::Start(idno))?;
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(external_id))))?;
        writer.write_event(Event::End(BytesEnd::new("idno")))?;
    }

    let tagging = write_pers_name(writer, record)?;

    write_life_event(writer, "birth", &record.birth)?;
    write_life_event(writer, "death", &record.death)?;

    // <note>
    if let Some(note) = &record.note {
        writer.write_event(Event::Start(BytesStart::new("note")))?;
        writer.write_event(Event::Start(BytesStart::new("p")))?;
        write_text(writer, note)?;
        writer.write_event(Event::End(BytesEnd::new("p")))?;
        writer.write_event(Event::End(BytesEnd::new("note")))?;
    }

    for target in pointer_targets(record) {
        let mut ptr = BytesStart::new("ptr");
        ptr.push_attribute(escaped_attribute("target", &target));
        writer.write_event(Event::Empty(ptr))?;
    }

    writer.write_event(Event::End(BytesEnd::new("person")))?;
    Ok(tagging)
}

/// `persName`要素を書き出す
///
/// 混合内容のため、子要素の前後には空のテキストイベントを挟み、
/// インデント処理による空白が内容に混入しないようにします。
fn write_pers_name<W: Write>(
    writer: &mut Writer<W>,
    record: &PersonRecord,
) -> Result<NameTagging, TeiPeopleError> {
    let (segments, tagging) = tag_name(&record.display_name, &record.first_name, &record.last_name);

    writer.write_event(Event::Start(BytesStart::new("persName")))?;
    for segment in segments {
        match segment {
            NameSegment::Text(text) => write_text(writer, text)?,
            NameSegment::Forename(text) => write_inline(writer, "forename", text)?,
            NameSegment::Surname(text) => write_inline(writer, "surname", text)?,
        }
    }
    write_text(writer, "")?;
    writer.write_event(Event::End(BytesEnd::new("persName")))?;
    Ok(tagging)
}

fn write_inline<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), TeiPeopleError> {
    write_text(writer, "")?;
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    write_text(writer, text)?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), TeiPeopleError> {
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    Ok(())
}

/// `birth`/`death`要素を書き出す（属性が1つもない場合は省略）
fn write_life_event<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    event: &LifeEvent,
) -> Result<(), TeiPeopleError> {
    let attributes = event.attributes();
    if attributes.is_empty() {
        return Ok(());
    }

    let mut element = BytesStart::new(name);
    for (key, value) in &attributes {
        element.push_attribute(escaped_attribute(key, value));
    }
    writer.write_event(Event::Empty(element))?;
    Ok(())
}

/// `ptr`要素の参照先（重複を除き、出現順を保持）
///
/// 典拠ファイルのURLが先頭、その後に出典メモから抽出したURLが続きます。
pub(crate) fn pointer_targets(record: &PersonRecord) -> Vec<String> {
    let authority = record
        .external_id
        .as_ref()
        .map(|id| format!("{}{}", VIAF_URL_PREFIX, id));
    let extracted = record
        .source_note
        .as_deref()
        .map(extract_urls)
        .unwrap_or_default();

    let mut targets: Vec<String> = Vec::new();
    for url in authority.into_iter().chain(extracted) {
        if !url.is_empty() && !targets.contains(&url) {
            targets.push(url);
        }
    }
    targets
}

/// エスケープ済みの値を持つ属性
///
/// quick-xmlの`(&str, &str)`からの変換は値を自動でエスケープするため、
/// `escape_attribute`の結果をそのまま保持する属性を直接構築します。
fn escaped_attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escape_attribute(value).into_bytes()),
    }
}
