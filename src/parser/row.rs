//! Row Decoder
//!
//! 位置ベースの行データを名前付きフィールドの`PersonRecord`に変換するアダプター。

use tracing::{debug, warn};

use crate::text::normalise_text;
use crate::types::{non_empty, Column, LifeEvent, PersonRecord};

/// 1行分のセル文字列を人物レコードに変換する
///
/// # 引数
///
/// * `cells` - トリム済みのセル文字列（列の並びは`Column`に従う）
/// * `row` - シート上の行番号（ログ出力用、1始まり）
///
/// # 戻り値
///
/// * `Some(PersonRecord)` - 変換したレコード
/// * `None` - すべてのセルが空の行（レコードではないため読み飛ばす）
///
/// 必要な列数に満たない行は空文字列で補って変換します。
///
/// # 使用例
///
/// ```rust
/// use teipeople::decode_row;
///
/// let mut cells = vec![String::new(); 16];
/// cells[0] = "1".to_string();
/// cells[2] = "Jane Doe".to_string();
///
/// let record = decode_row(&cells, 2).unwrap();
/// assert_eq!(record.xml_id(), "person-1");
/// assert_eq!(record.display_name, "Jane Doe");
/// ```
pub fn decode_row(cells: &[String], row: usize) -> Option<PersonRecord> {
    if cells.iter().all(|cell| cell.trim().is_empty()) {
        debug!(row, "Skipping blank row.");
        return None;
    }

    if cells.len() < Column::REQUIRED {
        warn!(
            row,
            columns = cells.len(),
            expected = Column::COUNT,
            "Row is narrower than the sheet layout; missing cells are treated as empty."
        );
    }

    let cell = |column: Column| cell_at(cells, column);

    Some(PersonRecord {
        row,
        id: cell(Column::Id).to_string(),
        display_name: normalise_text(cell(Column::DisplayName)),
        first_name: normalise_text(cell(Column::FirstName)),
        last_name: normalise_text(cell(Column::LastName)),
        birth: LifeEvent::from_cells(
            cell(Column::Birth),
            cell(Column::BirthNotBefore),
            cell(Column::BirthNotAfter),
        ),
        death: LifeEvent::from_cells(
            cell(Column::Death),
            cell(Column::DeathNotBefore),
            cell(Column::DeathNotAfter),
        ),
        external_id: non_empty(cell(Column::ExternalId)),
        note: non_empty(cell(Column::Note)),
        source_note: non_empty(cell(Column::SourceNote)),
    })
}

fn cell_at(cells: &[String], column: Column) -> &str {
    cells
        .get(column.index())
        .map(|value| value.trim())
        .unwrap_or_default()
}
