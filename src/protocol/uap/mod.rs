//! Per-category User Application Profile: the ordered data-field table
//! plus the factory that turns an item id into a zero-valued [`Field`].
pub mod cat001;
pub mod cat002;
pub mod cat021;
pub mod cat034;
pub mod cat048;
pub mod cat063;

use crate::core::{Category, DataFieldDescriptor};
use crate::error::{DecodeError, ErrorKind};
use crate::infra::codec::traits::Field;
use crate::protocol::record::Record;

/// Immutable per-category schema: FRN-ordered data fields and a factory
/// mapping item id to a freshly constructed, zero-valued [`Field`].
pub struct Uap {
    category: Category,
    version: &'static str,
    fields: &'static [DataFieldDescriptor],
    factory: fn(&'static str) -> Option<Box<dyn Field>>,
    /// Category-specific cross-field rule run after the generic mandatory-
    /// field check in [`Uap::validate`]. CAT048's "Measured Position
    /// required when TYP != 0" rule is the motivating case; the base
    /// kernel never hardcodes it.
    extra_validate: Option<fn(&Record) -> Result<(), DecodeError>>,
}

impl Uap {
    /// Build a UAP. Rejects an empty field list, FRN 0, and duplicate or
    /// out-of-order FRNs — the wire order of items is the slot order here.
    pub fn new(
        category: Category,
        version: &'static str,
        fields: &'static [DataFieldDescriptor],
        factory: fn(&'static str) -> Option<Box<dyn Field>>,
        extra_validate: Option<fn(&Record) -> Result<(), DecodeError>>,
    ) -> Result<Self, DecodeError> {
        if fields.is_empty() {
            return Err(DecodeError::new(
                ErrorKind::InvalidMessage,
                "UAP field table must not be empty",
            )
            .with_category(category));
        }
        let mut last_frn = 0u8;
        for (i, field) in fields.iter().enumerate() {
            if field.frn == 0 {
                return Err(DecodeError::new(
                    ErrorKind::InvalidMessage,
                    "FRN 0 is not a valid field reference number",
                )
                .with_category(category));
            }
            if i > 0 && field.frn <= last_frn {
                return Err(DecodeError::new(
                    ErrorKind::InvalidMessage,
                    "UAP field table must be sorted ascending by FRN with no duplicates",
                )
                .with_category(category));
            }
            last_frn = field.frn;
        }
        Ok(Self {
            category,
            version,
            fields,
            factory,
            extra_validate,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn fields(&self) -> &'static [DataFieldDescriptor] {
        self.fields
    }

    pub fn field_by_id(&self, id: &str) -> Option<&'static DataFieldDescriptor> {
        self.fields.iter().find(|f| f.item_id == id)
    }

    pub fn field_by_frn(&self, frn: u8) -> Option<&'static DataFieldDescriptor> {
        self.fields.iter().find(|f| f.frn == frn)
    }

    pub fn is_mandatory(&self, id: &str) -> bool {
        self.field_by_id(id).map(|f| f.mandatory).unwrap_or(false)
    }

    pub fn max_frn(&self) -> u8 {
        self.fields.last().map(|f| f.frn).unwrap_or(0)
    }

    /// Construct a zero-valued `Field` for `id`.
    pub fn create_data_item(&self, id: &'static str) -> Result<Box<dyn Field>, DecodeError> {
        (self.factory)(id).ok_or_else(|| {
            DecodeError::new(ErrorKind::UnknownDataItem, format!("unknown data item {id}"))
                .with_category(self.category)
                .with_item_id(id)
        })
    }

    /// Verify every mandatory slot is present in `record`, then run the
    /// category-specific cross-field rule if one is registered.
    pub fn validate(&self, record: &Record) -> Result<(), DecodeError> {
        for field in self.fields {
            if field.mandatory && !record.has_data_item(field.item_id) {
                return Err(DecodeError::new(
                    ErrorKind::MandatoryField,
                    format!("mandatory item {} missing", field.item_id),
                )
                .with_category(self.category)
                .with_item_id(field.item_id));
            }
        }
        if let Some(extra) = self.extra_validate {
            extra(record)?;
        }
        Ok(())
    }
}

/// Extends a [`Uap`] with message-type-specific validation: a designated
/// field carries a type code, and each known type maps to a description
/// and an optional extra validator. Motivated by CAT062/CAT065-style
/// message-type dispatch; none of this crate's shipped categories need
/// it, but the hook is here for downstream categories built on this crate.
pub struct TypedUap {
    pub base: Uap,
    pub type_field_id: &'static str,
    pub types: &'static [TypedVariant],
}

/// One recognized message-type value under a [`TypedUap`].
pub struct TypedVariant {
    pub value: u8,
    pub description: &'static str,
    pub validator: Option<fn(&Record) -> Result<(), DecodeError>>,
}

impl TypedUap {
    /// Validate using the base UAP rules, then dispatch to the variant
    /// matching the type field's current value.
    pub fn validate(&self, record: &Record, type_value: u8) -> Result<(), DecodeError> {
        self.base.validate(record)?;
        let variant = self.types.iter().find(|t| t.value == type_value).ok_or_else(|| {
            DecodeError::new(
                ErrorKind::InvalidField,
                format!("unrecognized message type {type_value}"),
            )
            .with_category(self.base.category)
            .with_item_id(self.type_field_id)
        })?;
        if let Some(validator) = variant.validator {
            validator(record)?;
        }
        Ok(())
    }
}
