//! Asset kinds managed by the console
//!
//! All five asset modules share the same query and export pipeline; what
//! differs is compiled-in configuration: which fields free-text search
//! looks at, which filter clauses the list view offers, and which columns an
//! export carries (see [`crate::export::projection`]).

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::export::ExportModel;
use crate::export::projection;
use crate::query::{Bound, Clause, FilterState};
use crate::record::Record;

/// One asset module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Permanent way: rails, sleepers, ballast, switches
    Track,
    /// Overhead line equipment and substations
    Electrification,
    /// Signals, track circuits, point machines
    Signaling,
    /// Bridges, tunnels and viaducts
    Structure,
    /// Passenger and freight stations
    Station,
}

impl AssetKind {
    /// Every kind, in menu order
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Track,
        AssetKind::Electrification,
        AssetKind::Signaling,
        AssetKind::Structure,
        AssetKind::Station,
    ];

    /// Collection name in the record store
    pub fn collection(&self) -> &'static str {
        match self {
            AssetKind::Track => "vias",
            AssetKind::Electrification => "eletrificacao",
            AssetKind::Signaling => "sinalizacao",
            AssetKind::Structure => "obras_arte",
            AssetKind::Station => "estacoes",
        }
    }

    /// Human-readable module name
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Track => "Via Permanente",
            AssetKind::Electrification => "Eletrificação",
            AssetKind::Signaling => "Sinalização",
            AssetKind::Structure => "Obras de Arte",
            AssetKind::Station => "Estações",
        }
    }

    /// Default export title
    pub fn report_title(&self) -> String {
        format!("Relatório de {}", self.label())
    }

    /// Default export file base name
    pub fn export_base_name(&self) -> String {
        format!("relatorio_{}", self.collection())
    }

    /// Fields the free-text clause searches
    pub fn searchable_fields(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Track => &["codigo", "fabricante", "tipo", "estado", "material"],
            AssetKind::Electrification => &["codigo", "fabricante", "tipo", "estado", "modelo"],
            AssetKind::Signaling => {
                &["codigo", "fabricante", "tipo", "estado", "modelo", "sistema"]
            }
            AssetKind::Structure => &["codigo", "nome", "tipo", "estado", "material"],
            AssetKind::Station => &["codigo", "nome", "tipo", "estado", "municipio"],
        }
    }

    /// The reset state of this module's filter form
    ///
    /// Every clause starts empty, so applying the result keeps every record
    /// and its active count is zero.
    pub fn default_filters(&self) -> FilterState {
        let base = FilterState::new()
            .with_clause("search", Clause::text(self.searchable_fields().iter().copied()))
            .with_clause("tipo", Clause::categorical("tipo"))
            .with_clause("estado", Clause::categorical("estado"));

        let km_field = |end: &'static str| match self {
            AssetKind::Station => "km",
            _ => end,
        };
        let with_km = |state: FilterState| {
            state
                .with_clause("km_inicial", Clause::numeric(km_field("km_inicial"), Bound::Lower))
                .with_clause("km_final", Clause::numeric(km_field("km_final"), Bound::Upper))
        };
        let with_dates = |state: FilterState, field: &str| {
            state
                .with_clause("data_inicio", Clause::date(field, Bound::Lower))
                .with_clause("data_fim", Clause::date(field, Bound::Upper))
        };

        match self {
            AssetKind::Track => with_dates(
                with_km(
                    base.with_clause("fabricante", Clause::categorical("fabricante"))
                        .with_clause("material", Clause::categorical("material")),
                ),
                "data_instalacao",
            ),
            AssetKind::Electrification => with_dates(
                with_km(base.with_clause("fabricante", Clause::categorical("fabricante")))
                    .with_clause(
                        "tensao_min",
                        Clause::numeric("parametros.tensao_nominal", Bound::Lower),
                    ),
                "data_instalacao",
            ),
            AssetKind::Signaling => with_dates(
                with_km(
                    base.with_clause("fabricante", Clause::categorical("fabricante"))
                        .with_clause("sistema", Clause::categorical("sistema")),
                ),
                "data_instalacao",
            ),
            AssetKind::Structure => with_dates(
                with_km(base.with_clause("material", Clause::categorical("material"))),
                "data_ultima_inspecao",
            ),
            AssetKind::Station => with_dates(
                with_km(base.with_clause("municipio", Clause::categorical("municipio"))),
                "data_inauguracao",
            ),
        }
    }

    /// Project records of this kind into an export model
    pub fn format_for_export(&self, records: &[Record]) -> ExportModel {
        match self {
            AssetKind::Track => projection::format_tracks_for_export(records),
            AssetKind::Electrification => projection::format_electrification_for_export(records),
            AssetKind::Signaling => projection::format_signaling_for_export(records),
            AssetKind::Structure => projection::format_structures_for_export(records),
            AssetKind::Station => projection::format_stations_for_export(records),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
