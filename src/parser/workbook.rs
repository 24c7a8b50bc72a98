//! Workbook Module
//!
//! calamineのラッパーとして、人物台帳シートの行を文字列として取り出します。

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use std::io::{Cursor, Read, Seek};
use tracing::info;

use crate::api::SheetSelector;
use crate::error::TeiPeopleError;

/// ワークブックリーダー
///
/// XLSX/XLS/ODSなど、calamineが対応する形式を扱います。
pub(crate) struct WorkbookReader<RS: Read + Seek> {
    sheets: Sheets<RS>,
}

impl WorkbookReader<Cursor<Vec<u8>>> {
    /// ワークブックをメモリに読み込んで開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - 読み込みに成功した場合
    /// * `Err(TeiPeopleError::Io)` - 入力の読み込みに失敗した場合
    /// * `Err(TeiPeopleError::Parse)` - スプレッドシートとして解析できない場合
    pub fn open<R: Read>(mut reader: R) -> Result<Self, TeiPeopleError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { sheets })
    }
}

impl<RS: Read + Seek> WorkbookReader<RS> {
    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシート名を解決する
    ///
    /// # 戻り値
    ///
    /// * `Err(TeiPeopleError::EmptyWorkbook)` - シートが1つもない場合
    /// * `Err(TeiPeopleError::Config)` - インデックスが範囲外、またはシート名が見つからない場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, TeiPeopleError> {
        let names = self.sheet_names();
        if names.is_empty() {
            return Err(TeiPeopleError::EmptyWorkbook);
        }

        match selector {
            SheetSelector::First => Ok(names[0].clone()),

            SheetSelector::Index(index) => names.get(*index).cloned().ok_or_else(|| {
                TeiPeopleError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    names.len()
                ))
            }),

            SheetSelector::Name(name) => {
                if !names.contains(name) {
                    return Err(TeiPeopleError::Config(format!("Sheet '{}' not found", name)));
                }
                Ok(name.clone())
            }
        }
    }

    /// 選択したシートのすべての行を、トリム済みの文字列として取得する
    ///
    /// 戻り値の各要素は（シート上の行番号（1始まり）, セル文字列の列）です。
    /// calamineの範囲は最初の非空セルから始まるため、先頭の空列は空文字列で埋め戻し、
    /// 列位置がシート上の位置と一致するようにします。
    pub fn rows(
        &mut self,
        selector: &SheetSelector,
    ) -> Result<Vec<(usize, Vec<String>)>, TeiPeopleError> {
        let sheet_name = self.select_sheet(selector)?;
        info!(sheet = %sheet_name, "Parsing the spreadsheet.");

        let range = self.sheets.worksheet_range(&sheet_name)?;
        Ok(range_to_rows(&range))
    }
}

fn range_to_rows(range: &Range<Data>) -> Vec<(usize, Vec<String>)> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    range
        .rows()
        .enumerate()
        .map(|(offset, cells)| {
            let mut row = vec![String::new(); start_col as usize];
            row.extend(cells.iter().map(|cell| cell_to_string(cell).trim().to_string()));
            (start_row as usize + offset + 1, row)
        })
        .collect()
}

/// セルの値を文字列に変換する
///
/// 数値は最短の10進表現（`1900.0` → `1900`）、日付セルは`YYYY-MM-DD`、
/// エラー値と空セルは空文字列になります。
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_date_to_string(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// 日付セルのシリアル値として扱う範囲（9999-12-31まで）
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

/// Excelの日付値を`YYYY-MM-DD`に変換する
///
/// エポック（1900年/1904年）と1900年の架空のうるう日はcalamineが処理します。
/// 期間書式のセルや範囲外の値はシリアル値のまま出力します。
fn excel_date_to_string(dt: &ExcelDateTime) -> String {
    let serial = dt.as_f64();
    if dt.is_duration() || !serial.is_finite() || serial.abs() >= MAX_DATE_SERIAL {
        return serial.to_string();
    }
    dt.as_datetime()
        .map(format_date)
        .unwrap_or_else(|| serial.to_string())
}

fn format_date(datetime: NaiveDateTime) -> String {
    datetime.date().format("%Y-%m-%d").to_string()
}
