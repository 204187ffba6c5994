//! Groups a flat intake record into the dashboard's display sections.

use serde::Serialize;

use crate::display::TimestampFormat;
use crate::meaningful::{is_meaningful, FieldValue};
use crate::record::{IntakeRecord, RecordField};

/// A titled group of record fields in the fixed display catalog.
#[derive(Debug)]
pub struct CatalogSection {
    pub title: &'static str,
    pub fields: &'static [(&'static str, RecordField)],
}

pub const SECTION_CATALOG: &[CatalogSection] = &[
    CatalogSection {
        title: "Core",
        fields: &[
            ("Phase", RecordField::Phase),
            ("Priority", RecordField::Priority),
            ("Client", RecordField::ClientName),
            ("Reporter", RecordField::ReporterName),
            ("Reporter role", RecordField::ReporterRole),
            ("Created", RecordField::CreatedAt),
        ],
    },
    CatalogSection {
        title: "Sales info",
        fields: &[
            ("Pain points", RecordField::PainPoints),
            ("AI models discussed", RecordField::AiModelsDiscussed),
        ],
    },
    CatalogSection {
        title: "Solutions info",
        fields: &[
            ("Technical constraints", RecordField::TechnicalConstraints),
            ("API information", RecordField::ApiInformation),
            ("Edge cases", RecordField::EdgeCases),
        ],
    },
    CatalogSection {
        title: "Engineering info",
        fields: &[
            ("Latency requirements", RecordField::LatencyRequirements),
            ("GPU cost notes", RecordField::GpuCostNotes),
            ("Deployment tag", RecordField::DeploymentTag),
        ],
    },
    CatalogSection {
        title: "Product info",
        fields: &[
            ("Performance metrics", RecordField::PerformanceMetrics),
            ("Pilot results", RecordField::PilotResults),
            ("Proprietary notes", RecordField::ProprietaryNotes),
        ],
    },
    CatalogSection {
        title: "Summary",
        fields: &[("Summary", RecordField::Summary)],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionItem {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub items: Vec<SectionItem>,
}

/// Build the ordered display sections for `record`.
///
/// Only meaningful fields survive, and sections left with no fields are
/// dropped entirely.
#[must_use]
pub fn build_sections(record: &IntakeRecord, format: &TimestampFormat) -> Vec<Section> {
    SECTION_CATALOG
        .iter()
        .filter_map(|section| {
            let items: Vec<SectionItem> = section
                .fields
                .iter()
                .filter_map(|&(label, field)| {
                    let value = record.field(field);
                    is_meaningful(value).then(|| SectionItem {
                        label,
                        value: display_text(value, format),
                    })
                })
                .collect();

            (!items.is_empty()).then_some(Section {
                title: section.title,
                items,
            })
        })
        .collect()
}

fn display_text(value: FieldValue<'_>, format: &TimestampFormat) -> String {
    match value {
        FieldValue::Null => String::new(),
        FieldValue::Text(text) => text.trim().to_string(),
        FieldValue::Timestamp(at) => format.format(at),
    }
}
