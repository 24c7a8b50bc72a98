//! Standoff Document
//!
//! 人物レコードの並びを定型のTEIテンプレートで包み、整形済みの文書を生成する。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use crate::builder::DocumentHeader;
use crate::error::TeiPeopleError;
use crate::output::person::write_person;
use crate::text::escape_text;
use crate::types::{NameTagging, PersonRecord};

/// TEI名前空間
const TEI_NAMESPACE: &str = "http://www.tei-c.org/ns/1.0";

/// スタンドオフ文書
///
/// 実行ごとにメモリ上で1回だけ構築し、最後に1回だけシリアライズします。
/// レコードは追加された順に出力されます。
///
/// # 使用例
///
/// ```rust
/// use teipeople::{DocumentHeader, PersonRecord, StandoffDocument};
///
/// # fn main() -> Result<(), teipeople::TeiPeopleError> {
/// let mut document = StandoffDocument::new(DocumentHeader::default(), 4);
/// document.push(PersonRecord {
///     id: "1".to_string(),
///     display_name: "Jane Doe".to_string(),
///     ..Default::default()
/// });
///
/// let xml = document.render()?;
/// assert!(xml.contains("<person xml:id=\"person-1\">"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StandoffDocument {
    header: DocumentHeader,
    indent: usize,
    records: Vec<PersonRecord>,
}

impl StandoffDocument {
    /// 空の文書を生成する
    pub fn new(header: DocumentHeader, indent: usize) -> Self {
        Self {
            header,
            indent,
            records: Vec::new(),
        }
    }

    /// レコードを末尾に追加する
    pub fn push(&mut self, record: PersonRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[PersonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 文書全体を整形済みの文字列として生成する
    pub fn render(&self) -> Result<String, TeiPeopleError> {
        self.render_tagged().map(|(xml, _)| xml)
    }

    /// 文書を生成し、各レコードの`persName`タグ付け結果とともに返す
    ///
    /// タグ付け結果はレコードの追加順に並びます。
    pub fn render_tagged(&self) -> Result<(String, Vec<NameTagging>), TeiPeopleError> {
        let mut buffer = Vec::new();
        let tagging = self.write_to(&mut buffer)?;
        Ok((String::from_utf8(buffer)?, tagging))
    }

    /// 文書全体をライターに書き出す（末尾に改行を付ける）
    ///
    /// 戻り値は各レコードの`persName`タグ付け結果です。
    pub fn write_to<W: Write>(&self, output: W) -> Result<Vec<NameTagging>, TeiPeopleError> {
        let mut writer = Writer::new_with_indent(output, b' ', self.indent);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let tei = BytesStart::new("TEI").with_attributes([("xmlns", TEI_NAMESPACE)]);
        writer.write_event(Event::Start(tei))?;

        // <teiHeader>
        open(&mut writer, "teiHeader")?;
        open(&mut writer, "fileDesc")?;

        open(&mut writer, "titleStmt")?;
        text_element(&mut writer, "title", &self.header.title)?;
        close(&mut writer, "titleStmt")?;

        open(&mut writer, "publicationStmt")?;
        text_element(&mut writer, "p", &self.header.publication)?;
        close(&mut writer, "publicationStmt")?;

        open(&mut writer, "sourceDesc")?;
        text_element(&mut writer, "p", &self.header.source_description)?;
        close(&mut writer, "sourceDesc")?;

        close(&mut writer, "fileDesc")?;
        close(&mut writer, "teiHeader")?;

        // <standOff>
        open(&mut writer, "standOff")?;
        let mut tagging = Vec::with_capacity(self.records.len());
        if self.records.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new("listPerson")))?;
        } else {
            open(&mut writer, "listPerson")?;
            for record in &self.records {
                tagging.push(write_person(&mut writer, record)?);
            }
            close(&mut writer, "listPerson")?;
        }
        close(&mut writer, "standOff")?;

        close(&mut writer, "TEI")?;

        let mut output = writer.into_inner();
        output.write_all(b"\n")?;
        output.flush()?;
        Ok(tagging)
    }
}

fn open<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), TeiPeopleError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), TeiPeopleError> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), TeiPeopleError> {
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    close(writer, name)
}
