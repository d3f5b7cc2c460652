//! Projection builders: domain records to [`ExportModel`]
//!
//! Each asset kind declares a fixed column list. A builder emits one row per
//! record with one cell per column, in column order. Missing fields,
//! including fields under a missing `parametros` object, become empty
//! cells, so the row width invariant holds for any record shape.

use chrono::NaiveDateTime;

use crate::domain::AssetKind;
use crate::record::{Record, parse_date, value_to_number, value_to_text};

use super::model::{Cell, ExportModel};

/// How a column renders its field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Numeric cell when the value reads as a number, text otherwise
    Number,
    /// `dd/mm/yyyy` when the value parses as a date, text otherwise
    Date,
}

/// One export column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub kind: ColumnKind,
}

const fn text(header: &'static str, field: &'static str) -> Column {
    Column { header, field, kind: ColumnKind::Text }
}

const fn number(header: &'static str, field: &'static str) -> Column {
    Column { header, field, kind: ColumnKind::Number }
}

const fn date(header: &'static str, field: &'static str) -> Column {
    Column { header, field, kind: ColumnKind::Date }
}

pub const TRACK_COLUMNS: &[Column] = &[
    text("Código", "codigo"),
    text("Tipo", "tipo"),
    text("Material", "material"),
    text("Fabricante", "fabricante"),
    text("Estado", "estado"),
    number("KM Inicial", "km_inicial"),
    number("KM Final", "km_final"),
    number("Bitola (mm)", "parametros.bitola"),
    text("Perfil do Trilho", "parametros.perfil_trilho"),
    date("Data de Instalação", "data_instalacao"),
];

pub const ELECTRIFICATION_COLUMNS: &[Column] = &[
    text("Código", "codigo"),
    text("Tipo", "tipo"),
    text("Fabricante", "fabricante"),
    text("Modelo", "modelo"),
    text("Estado", "estado"),
    number("KM Inicial", "km_inicial"),
    number("KM Final", "km_final"),
    number("Tensão Nominal (kV)", "parametros.tensao_nominal"),
    number("Corrente Máxima (A)", "parametros.corrente_maxima"),
    number("Potência (MVA)", "parametros.potencia"),
    date("Data de Instalação", "data_instalacao"),
];

pub const SIGNALING_COLUMNS: &[Column] = &[
    text("Código", "codigo"),
    text("Tipo", "tipo"),
    text("Sistema", "sistema"),
    text("Fabricante", "fabricante"),
    text("Modelo", "modelo"),
    text("Estado", "estado"),
    number("KM Inicial", "km_inicial"),
    number("KM Final", "km_final"),
    text("Protocolo", "parametros.protocolo"),
    date("Data de Instalação", "data_instalacao"),
];

pub const STRUCTURE_COLUMNS: &[Column] = &[
    text("Código", "codigo"),
    text("Nome", "nome"),
    text("Tipo", "tipo"),
    text("Material", "material"),
    text("Estado", "estado"),
    number("KM Inicial", "km_inicial"),
    number("KM Final", "km_final"),
    number("Extensão (m)", "parametros.extensao"),
    number("Vão Máximo (m)", "parametros.vao_maximo"),
    number("Gabarito Vertical (m)", "parametros.gabarito_vertical"),
    date("Última Inspeção", "data_ultima_inspecao"),
];

pub const STATION_COLUMNS: &[Column] = &[
    text("Código", "codigo"),
    text("Nome", "nome"),
    text("Tipo", "tipo"),
    text("Município", "municipio"),
    text("Estado", "estado"),
    number("KM", "km"),
    number("Plataformas", "parametros.plataformas"),
    number("Capacidade (pass/h)", "parametros.capacidade"),
    date("Inauguração", "data_inauguracao"),
];

/// Column list for an asset kind
pub fn columns_for(kind: AssetKind) -> &'static [Column] {
    match kind {
        AssetKind::Track => TRACK_COLUMNS,
        AssetKind::Electrification => ELECTRIFICATION_COLUMNS,
        AssetKind::Signaling => SIGNALING_COLUMNS,
        AssetKind::Structure => STRUCTURE_COLUMNS,
        AssetKind::Station => STATION_COLUMNS,
    }
}

/// Render one field of a record as a cell
pub fn project_cell(record: &Record, column: &Column) -> Cell {
    let Some(value) = record.get(column.field) else {
        return Cell::Empty;
    };

    match column.kind {
        ColumnKind::Text => Cell::from(value),
        ColumnKind::Number => match value_to_number(value) {
            Some(n) => Cell::Number(n),
            None => Cell::text(value_to_text(value)),
        },
        ColumnKind::Date => {
            let raw = value_to_text(value);
            match parse_date(&raw) {
                Some(dt) => Cell::Text(format_date(&dt)),
                None => Cell::text(raw),
            }
        }
    }
}

fn format_date(dt: &NaiveDateTime) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// Build a model from an arbitrary column list
pub fn project(columns: &[Column], records: &[Record]) -> ExportModel {
    let mut model = ExportModel::new(columns.iter().map(|c| c.header));
    model.rows = records
        .iter()
        .map(|record| columns.iter().map(|c| project_cell(record, c)).collect())
        .collect();
    model
}

fn project_kind(kind: AssetKind, records: &[Record]) -> ExportModel {
    project(columns_for(kind), records).with_title(kind.report_title())
}

pub fn format_tracks_for_export(records: &[Record]) -> ExportModel {
    project_kind(AssetKind::Track, records)
}

pub fn format_electrification_for_export(records: &[Record]) -> ExportModel {
    project_kind(AssetKind::Electrification, records)
}

pub fn format_signaling_for_export(records: &[Record]) -> ExportModel {
    project_kind(AssetKind::Signaling, records)
}

pub fn format_structures_for_export(records: &[Record]) -> ExportModel {
    project_kind(AssetKind::Structure, records)
}

pub fn format_stations_for_export(records: &[Record]) -> ExportModel {
    project_kind(AssetKind::Station, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track() -> Record {
        Record::from_fields(
            json!({
                "codigo": "VP-010",
                "tipo": "Trilho",
                "material": "Aço",
                "fabricante": "ArcelorMittal",
                "estado": "Ativo",
                "km_inicial": 10,
                "km_final": "12.5",
                "parametros": { "bitola": 1600, "perfil_trilho": "TR-68" },
                "data_instalacao": "2019-08-20T00:00:00Z"
            })
            .as_object()
            .cloned()
            .unwrap(),
        )
    }

    #[test]
    fn test_track_row() {
        let model = format_tracks_for_export(&[track()]);
        assert_eq!(model.title.as_deref(), Some("Relatório de Via Permanente"));
        assert_eq!(model.headers[0], "Código");
        assert_eq!(
            model.rows[0],
            vec![
                Cell::Text("VP-010".into()),
                Cell::Text("Trilho".into()),
                Cell::Text("Aço".into()),
                Cell::Text("ArcelorMittal".into()),
                Cell::Text("Ativo".into()),
                Cell::Number(10.0),
                Cell::Number(12.5),
                Cell::Number(1600.0),
                Cell::Text("TR-68".into()),
                Cell::Text("20/08/2019".into()),
            ]
        );
    }

    #[test]
    fn test_missing_parameters_yield_empty_cells() {
        let record = Record::new().with("codigo", "VP-011");
        let model = format_tracks_for_export(&[record]);
        let row = &model.rows[0];
        assert_eq!(row.len(), model.headers.len());
        assert_eq!(row[7], Cell::Empty);
        assert_eq!(row[8], Cell::Empty);
        assert_eq!(row[9], Cell::Empty);
    }

    #[test]
    fn test_unparseable_values_fall_back_to_text() {
        let record = Record::new()
            .with("km_inicial", "N/D")
            .with("data_instalacao", "desconhecida");
        let model = format_tracks_for_export(&[record]);
        assert_eq!(model.rows[0][5], Cell::Text("N/D".into()));
        assert_eq!(model.rows[0][9], Cell::Text("desconhecida".into()));
    }

    #[test]
    fn test_every_builder_keeps_row_width() {
        let records = vec![track(), Record::new(), Record::new().with("parametros", json!(null))];
        for kind in AssetKind::ALL {
            let model = kind.format_for_export(&records);
            assert_eq!(model.row_count(), 3);
            assert!(model.validate().is_ok());
            assert!(model.rows.iter().all(|r| r.len() == model.headers.len()));
        }
    }

    #[test]
    fn test_builders_are_pure() {
        let records = vec![track()];
        assert_eq!(
            format_tracks_for_export(&records),
            format_tracks_for_export(&records)
        );
    }

    #[test]
    fn test_empty_input_yields_headers_only() {
        let model = format_stations_for_export(&[]);
        assert_eq!(model.headers.len(), STATION_COLUMNS.len());
        assert!(model.rows.is_empty());
    }
}
