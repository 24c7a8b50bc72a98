//! Record Extractor
//!
//! スプレッドシートの各行を人物レコードに変換し、スタンドオフ文書として書き出すジョブ。

use std::fs::{self, File};
use std::io::Read;
use tracing::{debug, info, warn};

use crate::api::IdPolicy;
use crate::builder::Config;
use crate::error::TeiPeopleError;
use crate::output::StandoffDocument;
use crate::parser::{decode_row, WorkbookReader};
use crate::types::{PersonRecord, TagOutcome};

/// 抽出処理の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// ヘッダー行を除いたデータ行の数
    pub entries: usize,
    /// 出力した`person`要素の数
    pub written: usize,
    /// 空行として読み飛ばした行の数
    pub skipped_blank: usize,
    /// 名が氏名の中に見つからなかったレコードの数
    pub forename_misses: usize,
    /// 姓が氏名の中に見つからなかったレコードの数
    pub surname_misses: usize,
    /// 識別子が空のまま出力したレコードの数
    pub empty_ids: usize,
}

/// 人物台帳からスタンドオフ文書を生成するジョブ
///
/// # 使用例
///
/// ```rust,no_run
/// use teipeople::{ConfigBuilder, Extractor};
///
/// # fn main() -> Result<(), teipeople::TeiPeopleError> {
/// let config = ConfigBuilder::new("/data/letters").build()?;
/// let report = Extractor::new(&config).run()?;
/// println!("{} people written", report.written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor {
    config: Config,
}

impl Extractor {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 入力を読み込み、人物レコードの列と集計結果を返す
    ///
    /// 1行目はヘッダー行として読み飛ばします。
    /// 名・姓のタグ付け結果は文書の生成時に決まるため、
    /// この集計の`forename_misses`/`surname_misses`は常に0です（[`Extractor::render`]で集計）。
    ///
    /// # 発生し得るエラー
    ///
    /// * `TeiPeopleError::Parse` - スプレッドシートとして解析できない
    /// * `TeiPeopleError::MissingIdentifier` - `IdPolicy::Strict`で識別子が空の行がある
    pub fn records<R: Read>(
        &self,
        input: R,
    ) -> Result<(Vec<PersonRecord>, ExtractReport), TeiPeopleError> {
        let mut workbook = WorkbookReader::open(input)?;
        let rows = workbook.rows(self.config.sheet_selector())?;

        let entries = rows.len().saturating_sub(1);
        info!("Found {} entries.", entries);

        let mut report = ExtractReport {
            entries,
            ..ExtractReport::default()
        };
        let mut records = Vec::with_capacity(entries);

        for (row, cells) in rows.iter().skip(1) {
            let Some(record) = decode_row(cells, *row) else {
                report.skipped_blank += 1;
                continue;
            };
            debug!(row, id = %record.id, "Processing entry.");

            if record.id.is_empty() {
                match self.config.id_policy() {
                    IdPolicy::Strict => {
                        return Err(TeiPeopleError::MissingIdentifier { row: *row });
                    }
                    _ => {
                        warn!(row, "Entry has an empty identifier; emitting \"person-\".");
                        report.empty_ids += 1;
                    }
                }
            }

            records.push(record);
        }

        report.written = records.len();
        Ok((records, report))
    }

    /// 入力からスタンドオフ文書を生成し、文字列として返す
    ///
    /// 名・姓が氏名の中に見つからなかったレコードは警告を出し、集計に含めます。
    pub fn render<R: Read>(&self, input: R) -> Result<(String, ExtractReport), TeiPeopleError> {
        let (records, mut report) = self.records(input)?;

        let mut document =
            StandoffDocument::new(self.config.header().clone(), self.config.indent());
        for record in records {
            document.push(record);
        }

        let (xml, tagging) = document.render_tagged()?;
        for (record, tagging) in document.records().iter().zip(&tagging) {
            if tagging.forename == TagOutcome::Missing {
                warn!(
                    row = record.row,
                    name = %record.display_name,
                    forename = %record.first_name,
                    "Forename does not occur in the name; left untagged."
                );
                report.forename_misses += 1;
            }
            if tagging.surname == TagOutcome::Missing {
                warn!(
                    row = record.row,
                    name = %record.display_name,
                    surname = %record.last_name,
                    "Surname does not occur in the name; left untagged."
                );
                report.surname_misses += 1;
            }
        }

        Ok((xml, report))
    }

    /// 設定された入力ファイルを読み込み、設定された出力先に文書を書き出す
    ///
    /// 出力先の親ディレクトリは必要に応じて作成します。
    pub fn run(&self) -> Result<ExtractReport, TeiPeopleError> {
        let input_path = self.config.input();
        info!("Opening the \"{}\" file.", input_path.display());
        let input = File::open(input_path)?;

        let (content, report) = self.render(input)?;

        let output_path = self.config.output();
        info!("Saving process data to \"{}\".", output_path.display());
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ConfigBuilder;
    use rust_xlsxwriter::Workbook;
    use std::io::Cursor;

    fn register(rows: &[[&str; 4]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.write_string(0, 0, "ID").unwrap();
        for (i, [id, name, first, last]) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            worksheet.write_string(row, 0, *id).unwrap();
            worksheet.write_string(row, 2, *name).unwrap();
            worksheet.write_string(row, 3, *first).unwrap();
            worksheet.write_string(row, 10, *last).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_render_counts_tagging_misses() {
        let data = register(&[
            ["1", "Jane Doe", "Jane", "Doe"],
            ["2", "J. Smith", "John", "Smith"],
        ]);
        let config = ConfigBuilder::new(".").build().unwrap();
        let extractor = Extractor::new(&config);

        let (records, report) = extractor.records(Cursor::new(data.clone())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.entries, 2);
        assert_eq!(report.written, 2);
        assert_eq!(report.forename_misses, 0);

        let (xml, report) = extractor.render(Cursor::new(data)).unwrap();
        assert!(xml.contains("<persName>J. <surname>Smith</surname></persName>"));
        assert_eq!(report.forename_misses, 1);
        assert_eq!(report.surname_misses, 0);
    }

    #[test]
    fn test_records_empty_id_policies() {
        let data = register(&[["", "Jane Doe", "Jane", "Doe"]]);

        let permissive = ConfigBuilder::new(".").build().unwrap();
        let (records, report) = Extractor::new(&permissive)
            .records(Cursor::new(data.clone()))
            .unwrap();
        assert_eq!(records[0].xml_id(), "person-");
        assert_eq!(report.empty_ids, 1);

        let strict = ConfigBuilder::new(".")
            .with_id_policy(IdPolicy::Strict)
            .build()
            .unwrap();
        let result = Extractor::new(&strict).records(Cursor::new(data));
        assert!(matches!(
            result,
            Err(TeiPeopleError::MissingIdentifier { row: 2 })
        ));
    }

    #[test]
    fn test_render_header_only_sheet() {
        let data = register(&[]);
        let config = ConfigBuilder::new(".").build().unwrap();

        let (xml, report) = Extractor::new(&config).render(Cursor::new(data)).unwrap();

        assert_eq!(report, ExtractReport::default());
        assert!(xml.contains("<listPerson/>"));
    }
}
