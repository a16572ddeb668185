//! CAT048 (Monoradar Target Reports, Edition 1.31) UAP. The one shipped
//! category whose UAP layers a cross-field rule on top of the generic
//! mandatory-item check: Measured Position is required whenever the Target
//! Report Descriptor's TYP indicates anything other than a pure plot.
use crate::core::{Category, DataFieldDescriptor, ItemShape};
use crate::error::{DecodeError, ErrorKind};
use crate::infra::codec::traits::{Field, FieldValue};
use crate::protocol::fields::cat021::TargetReportDescriptor;
use crate::protocol::fields::cat048::{MeasuredPositionPolar, Mode3ACode};
use crate::protocol::fields::common::{Address24, DataSourceIdentifier, FractionalSigned, StatusByte};
use crate::protocol::record::Record;
use crate::protocol::uap::Uap;

const FIELDS: &[DataFieldDescriptor] = &[
    DataFieldDescriptor {
        frn: 1,
        item_id: "I048/010",
        description: "Data Source Identifier",
        shape: ItemShape::Fixed(2),
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 2,
        item_id: "I048/020",
        description: "Target Report Descriptor",
        shape: ItemShape::Extended,
        mandatory: true,
    },
    DataFieldDescriptor {
        frn: 3,
        item_id: "I048/040",
        description: "Measured Position in Polar Coordinates",
        shape: ItemShape::Fixed(4),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 4,
        item_id: "I048/070",
        description: "Mode-3/A Code",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 5,
        item_id: "I048/090",
        description: "Flight Level",
        shape: ItemShape::Fixed(2),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 6,
        item_id: "I048/220",
        description: "Aircraft Address",
        shape: ItemShape::Fixed(3),
        mandatory: false,
    },
    DataFieldDescriptor {
        frn: 7,
        item_id: "I048/230",
        description: "Communications/ACAS Capability and Flight Status",
        shape: ItemShape::Fixed(1),
        mandatory: false,
    },
];

fn factory(id: &'static str) -> Option<Box<dyn Field>> {
    match id {
        "I048/010" => Some(Box::<DataSourceIdentifier>::default()),
        "I048/020" => Some(Box::<TargetReportDescriptor>::default()),
        "I048/040" => Some(Box::<MeasuredPositionPolar>::default()),
        "I048/070" => Some(Box::<Mode3ACode>::default()),
        "I048/090" => Some(Box::new(FractionalSigned::new(16, 0.25))),
        "I048/220" => Some(Box::<Address24>::default()),
        "I048/230" => Some(Box::<StatusByte>::default()),
        _ => None,
    }
}

/// Measured Position is mandatory whenever TYP != 0 (anything beyond a
/// plain primary-only plot). The generic `Uap::validate` already checked
/// the table's unconditional mandatory slots; this only adds the
/// conditional one.
fn validate_measured_position_required(record: &Record) -> Result<(), DecodeError> {
    let Some(descriptor) = record.get_data_item("I048/020") else {
        return Ok(());
    };
    let typ = match descriptor.value() {
        FieldValue::Compound(entries) => entries.iter().find_map(|(name, value)| {
            if *name == "TYP" {
                if let FieldValue::U8(t) = value {
                    Some(*t)
                } else {
                    None
                }
            } else {
                None
            }
        }),
        _ => None,
    };
    if typ.unwrap_or(0) != 0 && !record.has_data_item("I048/040") {
        return Err(DecodeError::new(
            ErrorKind::MandatoryField,
            "I048/040 (Measured Position in Polar Coordinates) is required when I048/020 TYP != 0",
        )
        .with_category(record.category())
        .with_item_id("I048/040"));
    }
    Ok(())
}

/// See [`crate::protocol::uap::cat001::uap`] for why `expect` is safe here.
pub fn uap() -> Uap {
    Uap::new(
        Category(48),
        "1.31",
        FIELDS,
        factory,
        Some(validate_measured_position_required),
    )
    .expect("CAT048 UAP table is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn builds_successfully() {
        let uap = uap();
        assert_eq!(uap.category(), Category(48));
        assert!(uap.is_mandatory("I048/020"));
    }

    #[test]
    fn rejects_missing_measured_position_when_typ_nonzero() {
        let uap = Arc::new(uap());
        let mut record = Record::new(Category(48), Arc::clone(&uap)).unwrap();
        record
            .set_data_item("I048/010", Box::new(DataSourceIdentifier { sac: 0, sic: 1 }))
            .unwrap();
        record
            .set_data_item(
                "I048/020",
                Box::new(TargetReportDescriptor {
                    typ: 1,
                    ..Default::default()
                }),
            )
            .unwrap();
        let mut bytes = Vec::new();
        let err = record.encode(&mut bytes).unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::MandatoryField);
    }

    #[test]
    fn accepts_measured_position_present_when_typ_nonzero() {
        let uap = Arc::new(uap());
        let mut record = Record::new(Category(48), Arc::clone(&uap)).unwrap();
        record
            .set_data_item("I048/010", Box::new(DataSourceIdentifier { sac: 0, sic: 1 }))
            .unwrap();
        record
            .set_data_item(
                "I048/020",
                Box::new(TargetReportDescriptor {
                    typ: 1,
                    ..Default::default()
                }),
            )
            .unwrap();
        record
            .set_data_item(
                "I048/040",
                Box::new(MeasuredPositionPolar {
                    rho_nm: 5.0,
                    theta_deg: 10.0,
                }),
            )
            .unwrap();
        let mut bytes = Vec::new();
        record.encode(&mut bytes).unwrap();
    }
}
